// [libs/core/audit/src/verify.rs]
//! Chain replay verification (§4.7): recompute each event's HMAC and check
//! `prev_hash` against the previous event's `hash`; report the first
//! mismatch by event id.

use aegis_domain_models::audit::{AuditEvent, GENESIS_HASH};
use aegis_domain_models::error::AppError;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ChainViolation {
    pub event_id: String,
    pub reason: String,
}

pub fn verify_file(path: &Path, key: &[u8]) -> Result<Vec<ChainViolation>, AppError> {
    let file = std::fs::File::open(path).map_err(|e| AppError::internal(format!("failed to open audit log: {e}")))?;
    let reader = std::io::BufReader::new(file);

    let mut violations = Vec::new();
    let mut expected_prev = GENESIS_HASH.to_string();

    for line in reader.lines() {
        let line = line.map_err(|e| AppError::internal(format!("failed to read audit log line: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: AuditEvent = serde_json::from_str(&line)
            .map_err(|e| AppError::internal(format!("failed to parse audit log line: {e}")))?;

        if event.prev_hash != expected_prev {
            violations.push(ChainViolation {
                event_id: event.id.clone(),
                reason: format!("prev_hash mismatch: expected {expected_prev}, got {}", event.prev_hash),
            });
        }

        let Some(recorded_hash) = event.hash.clone() else {
            violations.push(ChainViolation { event_id: event.id.clone(), reason: "event has no hash".to_string() });
            continue;
        };

        let recomputed = crate::hash::compute_hash(key, &event)?;
        if recomputed != recorded_hash {
            violations.push(ChainViolation {
                event_id: event.id.clone(),
                reason: "HMAC does not match recomputed value".to_string(),
            });
        }

        expected_prev = recorded_hash;
    }

    Ok(violations)
}
