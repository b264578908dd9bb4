// [libs/domain/models/src/priority.rs]
use serde::{Deserialize, Serialize};

/// Queue admission priority (§3 Queue entry). Ord is derived so that
/// `High < Normal < Low` — a `BinaryHeap<Reverse<_>>` keyed on this pulls
/// High-priority entries first, matching the "High index wins" rule in §4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High = 0,
    Normal = 1,
    Low = 2,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}
