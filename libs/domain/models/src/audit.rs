// [libs/domain/models/src/audit.rs]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Audit event kind. Free-form beyond the fixed set the orchestrator emits
/// itself (`QUERY`), so handlers outside the core can log their own kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditKind(pub String);

impl AuditKind {
    pub fn query() -> Self {
        AuditKind("QUERY".to_string())
    }
}

impl From<&str> for AuditKind {
    fn from(s: &str) -> Self {
        AuditKind(s.to_string())
    }
}

/// Severity levels referenced throughout §7's propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// A single tamper-evident audit record (§3 Audit event, §4.7).
///
/// `hash` covers every other field via `HMAC_SHA256(key,
/// canonical_json(event_without_hash))` — see `aegis-core-audit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub timestamp: String,
    pub kind: AuditKind,
    pub severity: Severity,
    pub action: String,
    pub user: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    /// `BTreeMap`, not `HashMap`: key order feeds `canonical_json` for the
    /// HMAC, and must be identical across processes replaying the same log.
    pub details: BTreeMap<String, serde_json::Value>,
    pub success: bool,
    pub error: Option<String>,
    pub prev_hash: String,
    /// Present on every persisted event; `None` only for the value passed
    /// into the HMAC computation itself (`event_without_hash`).
    pub hash: Option<String>,
}

pub const GENESIS_HASH: &str = "GENESIS";
