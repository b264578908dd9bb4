// [libs/core/integrity/src/hash_db.rs]
//! In-memory hash database: the union of a compiled-in known-good set and a
//! user-local JSON store (§4.1 `AddHash`/`Save`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One known-good model entry, keyed by filename in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownHash {
    pub filename: String,
    pub size_bytes: u64,
    pub sha256_hex: String,
}

/// Compiled-in set of known-good model hashes. Empty by default — real
/// deployments seed this at build time from a vendored manifest; the
/// mechanism (not the data) is what this crate owns.
fn builtin_hashes() -> Vec<KnownHash> {
    Vec::new()
}

/// Union of the compiled-in set and a user-local JSON file, keyed by
/// filename so callers can verify a path without caring where it lives.
#[derive(Debug, Default)]
pub struct HashDatabase {
    entries: HashMap<String, KnownHash>,
    user_store_path: Option<PathBuf>,
}

impl HashDatabase {
    /// Load the builtin set plus, if present, a user-local JSON store at
    /// `user_store_path`. A missing or unreadable user store is not an
    /// error — it simply means no user-added hashes yet.
    pub fn load(user_store_path: impl Into<PathBuf>) -> Self {
        let user_store_path = user_store_path.into();
        let mut entries = HashMap::new();
        for known in builtin_hashes() {
            entries.insert(known.filename.clone(), known);
        }

        if let Ok(contents) = std::fs::read_to_string(&user_store_path) {
            if let Ok(user_entries) = serde_json::from_str::<Vec<KnownHash>>(&contents) {
                for known in user_entries {
                    entries.insert(known.filename.clone(), known);
                }
            }
        }

        Self { entries, user_store_path: Some(user_store_path) }
    }

    pub fn in_memory() -> Self {
        Self { entries: HashMap::new(), user_store_path: None }
    }

    fn filename_of(path: &Path) -> String {
        path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
    }

    pub fn expected_hash(&self, path: &Path) -> Option<String> {
        self.entries.get(&Self::filename_of(path)).map(|k| k.sha256_hex.clone())
    }

    pub fn expected_size(&self, path: &Path) -> Option<u64> {
        self.entries.get(&Self::filename_of(path)).map(|k| k.size_bytes)
    }

    /// Add or replace a hash entry in memory. Call `save` to persist.
    pub fn add_hash(&mut self, known: KnownHash) {
        self.entries.insert(known.filename.clone(), known);
    }

    /// Atomically persist the user-local entries: write to a sibling temp
    /// file then rename over the destination, so a crash mid-write never
    /// leaves a half-written store behind.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.user_store_path else {
            return Ok(());
        };
        let entries: Vec<&KnownHash> = self.entries.values().collect();
        let serialized = serde_json::to_string_pretty(&entries)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, serialized)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
