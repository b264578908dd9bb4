// [libs/core/audit/src/hash.rs]
//! `hash = HMAC_SHA256(key, canonical_json(event_without_hash))` (§3, §4.7).

use aegis_domain_models::audit::AuditEvent;
use aegis_domain_models::error::AppError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Canonical JSON of an event with the `hash` field removed. `serde_json`'s
/// default `Map` is key-sorted (the `preserve_order` feature is not
/// enabled), so this is stable across processes regardless of `details`
/// insertion order or struct field order.
pub fn canonical_bytes(event: &AuditEvent) -> Result<Vec<u8>, AppError> {
    let mut value = serde_json::to_value(event)
        .map_err(|e| AppError::internal(format!("failed to serialize audit event: {e}")))?;
    if let Some(object) = value.as_object_mut() {
        object.remove("hash");
    }
    serde_json::to_vec(&value)
        .map_err(|e| AppError::internal(format!("failed to canonicalize audit event: {e}")))
}

pub fn compute_hash(key: &[u8], event: &AuditEvent) -> Result<String, AppError> {
    let bytes = canonical_bytes(event)?;
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::internal(format!("invalid HMAC key length: {e}")))?;
    mac.update(&bytes);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
