// [libs/core/degradation/src/manager.rs]
//! Degradation Manager (C3): ticks the Resource Probe, classifies the result
//! against the level ladder, and publishes changes to subscribers. Callback
//! fan-out (via the watch channel) never blocks the tick loop itself.

use aegis_domain_models::level::DegradationLevel;
use aegis_domain_models::snapshot::DegradationSnapshot;
use aegis_core_resource::ResourceProbe;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::transition::TransitionState;

/// Queue-side counters the manager folds into its classification, supplied
/// by whatever owns the request queue (C8). Kept as a trait here so this
/// crate never depends on the queue crate.
pub trait QueueSignal: Send + Sync {
    fn active_requests(&self) -> usize;
    fn queued_requests(&self) -> usize;
}

/// A `QueueSignal` that always reports zero load — useful before the queue
/// is wired up, and in tests.
pub struct NoQueueSignal;

impl QueueSignal for NoQueueSignal {
    fn active_requests(&self) -> usize {
        0
    }
    fn queued_requests(&self) -> usize {
        0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DegradationConfig {
    pub tick_interval: Duration,
    pub recovery_delay: Duration,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self { tick_interval: Duration::from_secs(5), recovery_delay: Duration::from_secs(30) }
    }
}

struct Counters {
    mem_used_bytes: AtomicU64,
    mem_total_bytes: AtomicU64,
    task_count: AtomicUsize,
    started_at: Instant,
}

pub struct DegradationManager {
    config: DegradationConfig,
    level_tx: watch::Sender<DegradationLevel>,
    counters: Arc<Counters>,
}

pub struct DegradationHandle {
    pub levels: watch::Receiver<DegradationLevel>,
    join: JoinHandle<()>,
}

impl DegradationHandle {
    pub fn abort(&self) {
        self.join.abort();
    }
}

impl DegradationManager {
    pub fn new(config: DegradationConfig) -> Self {
        let (level_tx, _) = watch::channel(DegradationLevel::Normal);
        Self {
            config,
            level_tx,
            counters: Arc::new(Counters {
                mem_used_bytes: AtomicU64::new(0),
                mem_total_bytes: AtomicU64::new(0),
                task_count: AtomicUsize::new(0),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn current_level(&self) -> DegradationLevel {
        *self.level_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<DegradationLevel> {
        self.level_tx.subscribe()
    }

    /// Current queue/resource snapshot for the `/status` surface (§3).
    pub fn snapshot(&self, queue: &dyn QueueSignal) -> DegradationSnapshot {
        DegradationSnapshot {
            level: self.current_level(),
            mem_used_bytes: self.counters.mem_used_bytes.load(Ordering::Relaxed),
            mem_total_bytes: self.counters.mem_total_bytes.load(Ordering::Relaxed),
            active_requests: queue.active_requests(),
            queued_requests: queue.queued_requests(),
            task_count: self.counters.task_count.load(Ordering::Relaxed),
            monotonic_ms: self.counters.started_at.elapsed().as_millis() as u64,
        }
    }

    /// Spawns the tick loop. The returned handle owns a receiver that always
    /// observes the latest published level; callers clone it freely.
    pub fn start(
        self: Arc<Self>,
        probe: Arc<ResourceProbe>,
        queue: Arc<dyn QueueSignal>,
    ) -> DegradationHandle {
        let levels = self.level_tx.subscribe();
        let manager = Arc::clone(&self);

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(manager.config.tick_interval);
            let mut state = TransitionState::new(Instant::now());

            loop {
                ticker.tick().await;

                let resource = probe.snapshot();
                manager.counters.mem_used_bytes.store(resource.mem_used_bytes, Ordering::Relaxed);
                manager.counters.mem_total_bytes.store(resource.mem_total_bytes, Ordering::Relaxed);
                manager.counters.task_count.store(queue.active_requests(), Ordering::Relaxed);

                let target = DegradationLevel::classify(resource.mem_pct(), queue.queued_requests());
                if let Some(new_level) =
                    state.observe(target, manager.config.recovery_delay, Instant::now())
                {
                    tracing::info!(target: "degradation_manager", ?new_level, "degradation level changed");
                    let _ = manager.level_tx.send(new_level);
                }
            }
        });

        DegradationHandle { levels, join }
    }
}
