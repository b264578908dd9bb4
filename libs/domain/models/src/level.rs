// [libs/domain/models/src/level.rs]
use serde::{Deserialize, Serialize};

/// Degradation posture (§3, §4.2). Ord is derived so comparisons like
/// "has the level gotten worse" read naturally: `Normal < Reduced < Minimal
/// < Emergency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradationLevel {
    Normal,
    Reduced,
    Minimal,
    Emergency,
}

impl Default for DegradationLevel {
    fn default() -> Self {
        DegradationLevel::Normal
    }
}

/// Static policy knobs for a level, per the §4.2 ladder table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPolicy {
    pub mem_pct_trigger: u8,
    pub queue_trigger: usize,
    pub max_concurrent: usize,
    pub max_context: u32,
    pub max_output: u32,
    /// When true, the queue must reject new admissions outright (Emergency).
    pub reject_new: bool,
}

impl DegradationLevel {
    /// Policy for this level, per the §4.2 ladder.
    pub fn policy(self) -> LevelPolicy {
        match self {
            DegradationLevel::Normal => LevelPolicy {
                mem_pct_trigger: 70,
                queue_trigger: 10,
                max_concurrent: 10,
                max_context: 8192,
                max_output: 2048,
                reject_new: false,
            },
            DegradationLevel::Reduced => LevelPolicy {
                mem_pct_trigger: 70,
                queue_trigger: 10,
                max_concurrent: 5,
                max_context: 4096,
                max_output: 1024,
                reject_new: false,
            },
            DegradationLevel::Minimal => LevelPolicy {
                mem_pct_trigger: 85,
                queue_trigger: 25,
                max_concurrent: 2,
                max_context: 2048,
                max_output: 512,
                reject_new: false,
            },
            DegradationLevel::Emergency => LevelPolicy {
                mem_pct_trigger: 95,
                queue_trigger: 50,
                max_concurrent: 1,
                max_context: 512,
                max_output: 256,
                reject_new: true,
            },
        }
    }

    /// Multiplier applied to the configured cache TTL at this level — the
    /// "adjust cache aggressiveness" behavior from §4.8, made concrete.
    pub fn cache_ttl_factor(self) -> f64 {
        match self {
            DegradationLevel::Normal => 1.0,
            DegradationLevel::Reduced => 0.75,
            DegradationLevel::Minimal => 0.5,
            DegradationLevel::Emergency => 0.25,
        }
    }

    /// Rank used to decide upgrade vs. downgrade direction in the hysteresis
    /// logic (§4.2: "Upgrades ... are immediate", downgrades are delayed).
    pub fn rank(self) -> u8 {
        match self {
            DegradationLevel::Normal => 0,
            DegradationLevel::Reduced => 1,
            DegradationLevel::Minimal => 2,
            DegradationLevel::Emergency => 3,
        }
    }

    /// Classify a (mem%, queue depth) observation against the ladder,
    /// picking the worst level whose trigger is met.
    pub fn classify(mem_pct: f64, queue_depth: usize) -> DegradationLevel {
        let levels = [
            DegradationLevel::Emergency,
            DegradationLevel::Minimal,
            DegradationLevel::Reduced,
            DegradationLevel::Normal,
        ];
        for level in levels {
            let policy = level.policy();
            if level == DegradationLevel::Normal {
                return DegradationLevel::Normal;
            }
            if mem_pct >= policy.mem_pct_trigger as f64 || queue_depth >= policy.queue_trigger {
                return level;
            }
        }
        DegradationLevel::Normal
    }
}
