// [libs/domain/models/src/backend.rs]
use serde::{Deserialize, Serialize};

/// Per-process lifecycle state (§4.4 Watchdog state machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendState {
    Stopped,
    Starting,
    Running,
    Unhealthy,
    Failed,
}

/// Externally-observable status of one supervised backend instance (§3
/// Backend instance), used by the `/status` surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub model_id: String,
    pub port: u16,
    pub state: BackendState,
    pub last_health_at: Option<String>,
    pub restart_count: usize,
    pub last_error: Option<String>,
}
