// [libs/core/integrity/src/lib.rs]
//! Integrity Verifier (C1): streaming hash verification, quick size checks,
//! and signed manifest import. Verification never mutates the file under
//! test; failures surface as structured results, never as a process abort.

pub mod hash_db;
pub mod manifest;
pub mod verify;

pub use hash_db::{HashDatabase, KnownHash};
pub use manifest::{verify_signed_manifest, ManifestError, ManifestModelEntry, SignedManifest};
pub use verify::{quick_check, verify_file, VerifyResult};
