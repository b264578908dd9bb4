// [libs/core/queue/src/cancellation.rs]
//! Lightweight cancellation token (§4.5: "the caller's context cancellation
//! is propagated into ProcessFunc"). No `tokio-util` dependency — this is
//! deliberately a single atomic flag, cheap to clone and check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
