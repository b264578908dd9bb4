// [libs/core/degradation/src/lib.rs]
//! Degradation Manager (C3): computes a degradation level from resource and
//! queue-depth signals on a fixed tick, publishing changes to subscribers.

pub mod manager;
pub mod transition;

pub use manager::{DegradationConfig, DegradationHandle, DegradationManager, NoQueueSignal, QueueSignal};
pub use transition::TransitionState;
