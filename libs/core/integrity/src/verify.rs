// [libs/core/integrity/src/verify.rs]
//! Streaming SHA-256 file verification (§4.1 `VerifyFile`/`QuickCheck`).

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

use crate::hash_db::HashDatabase;

/// 1 MiB read chunks — bounds peak memory regardless of model file size.
const CHUNK_SIZE: usize = 1024 * 1024;

/// Result of a full streaming hash verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    pub size_bytes: u64,
    pub hash_hex: String,
    pub known: bool,
    pub expected_hash_hex: Option<String>,
    pub valid: bool,
}

/// Stream `path` in 1 MiB chunks, computing its SHA-256 without ever holding
/// the whole file in memory. Never mutates the file.
pub fn verify_file(path: &Path, db: &HashDatabase) -> std::io::Result<VerifyResult> {
    let metadata = std::fs::metadata(path)?;
    let size_bytes = metadata.len();

    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    let hash_hex = hex::encode(hasher.finalize());
    let expected = db.expected_hash(path);

    let (known, expected_hash_hex, valid) = match expected {
        Some(expected_hash) => {
            let matches = expected_hash == hash_hex;
            (true, Some(expected_hash), matches)
        }
        None => (false, None, true),
    };

    Ok(VerifyResult { size_bytes, hash_hex, known, expected_hash_hex, valid })
}

/// Constant-time-in-effort (size only, no hashing) check used on startup
/// scans. Per §8 Testable Property 12: this alone cannot be relied on for
/// tamper detection — a byte flip that preserves file size is invisible to
/// `quick_check`.
pub fn quick_check(path: &Path, db: &HashDatabase) -> std::io::Result<bool> {
    let metadata = std::fs::metadata(path)?;
    Ok(db.expected_size(path).map(|expected| expected == metadata.len()).unwrap_or(true))
}
