// [libs/domain/models/src/snapshot.rs]
use serde::{Deserialize, Serialize};

use crate::level::DegradationLevel;

/// One GPU device reading (§4.2 Resource Probe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuReading {
    pub index: u32,
    pub name: String,
    pub vram_total_mb: u64,
    pub vram_free_mb: u64,
    pub vram_used_mb: u64,
    pub utilization_pct: f32,
    pub temperature_celsius: Option<f32>,
}

/// Host resource snapshot (§4.2). GPU absence is a normal state: `gpus` is
/// simply empty, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub mem_total_bytes: u64,
    pub mem_used_bytes: u64,
    pub cpu_utilization_pct: f32,
    pub disk_free_bytes: u64,
    pub gpus: Vec<GpuReading>,
}

impl ResourceSnapshot {
    pub fn mem_pct(&self) -> f64 {
        if self.mem_total_bytes == 0 {
            return 0.0;
        }
        (self.mem_used_bytes as f64 / self.mem_total_bytes as f64) * 100.0
    }
}

/// Degradation posture snapshot (§3 Degradation snapshot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationSnapshot {
    pub level: DegradationLevel,
    pub mem_used_bytes: u64,
    pub mem_total_bytes: u64,
    pub active_requests: usize,
    pub queued_requests: usize,
    pub task_count: usize,
    /// Monotonic milliseconds since the degradation manager started, not a
    /// wall-clock timestamp — safe to compare across ticks even if the
    /// system clock is adjusted.
    pub monotonic_ms: u64,
}
