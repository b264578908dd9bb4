// [libs/core/queue/src/entry.rs]
//! Queue entry (§3 Queue entry): single-use, garbage on completion.

use aegis_domain_models::error::AppError;
use aegis_domain_models::priority::Priority;
use std::time::Instant;
use tokio::sync::oneshot;

use crate::cancellation::CancellationToken;

/// Priority-then-FIFO ordering key. Wrapped in `Reverse` at the heap so the
/// smallest `(priority, seq)` — i.e. highest priority, earliest enqueued —
/// pops first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderKey {
    pub priority: Priority,
    pub seq: u64,
}

pub struct QueueEntry<Req, Resp> {
    pub seq: u64,
    pub priority: Priority,
    pub enqueued_at: Instant,
    pub deadline: Instant,
    pub cancellation: CancellationToken,
    pub payload: Req,
    pub reply_tx: oneshot::Sender<Result<Resp, AppError>>,
}

impl<Req, Resp> QueueEntry<Req, Resp> {
    pub fn order_key(&self) -> OrderKey {
        OrderKey { priority: self.priority, seq: self.seq }
    }
}
