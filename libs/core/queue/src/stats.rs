// [libs/core/queue/src/stats.rs]
//! Queue stats (§4.5): queued, running, completed-ok/error, rejected,
//! average wait, average run — updated with interior atomics so readers
//! never contend with workers.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct QueueStats {
    queued: AtomicUsize,
    running: AtomicUsize,
    completed_ok: AtomicU64,
    completed_error: AtomicU64,
    rejected: AtomicU64,
    total_wait_micros: AtomicU64,
    total_run_micros: AtomicU64,
    wait_samples: AtomicU64,
    run_samples: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueStatsSnapshot {
    pub queued: usize,
    pub running: usize,
    pub completed_ok: u64,
    pub completed_error: u64,
    pub rejected: u64,
    pub average_wait_micros: f64,
    pub average_run_micros: f64,
}

impl QueueStats {
    pub fn on_enqueue(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_reject(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// An entry that was sitting in the heap, never dequeued, and got
    /// canceled out from under it (shutdown draining the backlog).
    pub fn on_cancel(&self) {
        self.queued.fetch_sub(1, Ordering::Relaxed);
        self.completed_error.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_dequeue(&self) {
        self.queued.fetch_sub(1, Ordering::Relaxed);
        self.running.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_complete(&self, ok: bool, wait_micros: u64, run_micros: u64) {
        self.running.fetch_sub(1, Ordering::Relaxed);
        if ok {
            self.completed_ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.completed_error.fetch_add(1, Ordering::Relaxed);
        }
        self.total_wait_micros.fetch_add(wait_micros, Ordering::Relaxed);
        self.wait_samples.fetch_add(1, Ordering::Relaxed);
        self.total_run_micros.fetch_add(run_micros, Ordering::Relaxed);
        self.run_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> QueueStatsSnapshot {
        let wait_samples = self.wait_samples.load(Ordering::Relaxed).max(1);
        let run_samples = self.run_samples.load(Ordering::Relaxed).max(1);
        QueueStatsSnapshot {
            queued: self.queued.load(Ordering::Relaxed),
            running: self.running.load(Ordering::Relaxed),
            completed_ok: self.completed_ok.load(Ordering::Relaxed),
            completed_error: self.completed_error.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            average_wait_micros: self.total_wait_micros.load(Ordering::Relaxed) as f64 / wait_samples as f64,
            average_run_micros: self.total_run_micros.load(Ordering::Relaxed) as f64 / run_samples as f64,
        }
    }
}
