// [libs/core/audit/src/key.rs]
//! Per-host HMAC key for the audit chain (§4.7): generated once with a
//! cryptographic RNG, persisted at mode 0600, reused on subsequent runs.

use aegis_domain_models::error::AppError;
use rand::RngCore;
use std::io::Write;
use std::path::Path;

const KEY_LEN: usize = 32;

pub fn load_or_create_key(path: &Path) -> Result<[u8; KEY_LEN], AppError> {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let bytes = hex::decode(existing.trim())
            .map_err(|e| AppError::internal(format!("audit key file is not valid hex: {e}")))?;
        if bytes.len() != KEY_LEN {
            return Err(AppError::internal("audit key file has unexpected length"));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&bytes);
        return Ok(key);
    }

    let mut key = [0u8; KEY_LEN];
    rand::rngs::OsRng.fill_bytes(&mut key);
    write_key_file(path, &key)?;
    Ok(key)
}

#[cfg(unix)]
fn write_key_file(path: &Path, key: &[u8; KEY_LEN]) -> Result<(), AppError> {
    use std::os::unix::fs::OpenOptionsExt;

    let tmp_path = path.with_extension("tmp");
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(&tmp_path)
        .map_err(|e| AppError::internal(format!("failed to create audit key file: {e}")))?;
    file.write_all(hex::encode(key).as_bytes())
        .map_err(|e| AppError::internal(format!("failed to write audit key: {e}")))?;
    file.sync_all().ok();
    std::fs::rename(&tmp_path, path)
        .map_err(|e| AppError::internal(format!("failed to install audit key file: {e}")))?;
    Ok(())
}

#[cfg(not(unix))]
fn write_key_file(path: &Path, key: &[u8; KEY_LEN]) -> Result<(), AppError> {
    std::fs::write(path, hex::encode(key))
        .map_err(|e| AppError::internal(format!("failed to write audit key: {e}")))
}
