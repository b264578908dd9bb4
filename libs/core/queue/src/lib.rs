// [libs/core/queue/src/lib.rs]
//! Request Queue (C8): priority admission, bounded concurrency, per-request
//! deadline and cancellation (§4.5).

pub mod admission;
pub mod cancellation;
pub mod config;
pub mod entry;
pub mod queue;
pub mod stats;

pub use admission::{AdmissionContext, AlwaysAdmit};
pub use cancellation::CancellationToken;
pub use config::QueueConfig;
pub use entry::{OrderKey, QueueEntry};
pub use queue::{spawn_dispatcher, BoxFuture, ProcessFn, RequestQueue};
pub use stats::{QueueStats, QueueStatsSnapshot};
