// [libs/core/queue/src/queue.rs]
//! Request Queue (C8): priority admission, bounded concurrency, per-request
//! deadline, cancellation propagation (§4.5).

use aegis_domain_models::error::AppError;
use aegis_domain_models::level::DegradationLevel;
use aegis_domain_models::priority::Priority;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{watch, Notify, Semaphore};

use crate::admission::AdmissionContext;
use crate::cancellation::CancellationToken;
use crate::config::QueueConfig;
use crate::entry::{OrderKey, QueueEntry};
use crate::stats::{QueueStats, QueueStatsSnapshot};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
pub type ProcessFn<Req, Resp> = Arc<dyn Fn(Req, Duration) -> BoxFuture<Result<Resp, AppError>> + Send + Sync>;

struct HeapItem<Req, Resp>(QueueEntry<Req, Resp>);

impl<Req, Resp> PartialEq for HeapItem<Req, Resp> {
    fn eq(&self, other: &Self) -> bool {
        self.0.order_key() == other.0.order_key()
    }
}
impl<Req, Resp> Eq for HeapItem<Req, Resp> {}
impl<Req, Resp> PartialOrd for HeapItem<Req, Resp> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<Req, Resp> Ord for HeapItem<Req, Resp> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.order_key().cmp(&other.0.order_key())
    }
}

struct QueueState<Req, Resp> {
    heap: BinaryHeap<Reverse<HeapItem<Req, Resp>>>,
}

pub struct RequestQueue<Req, Resp> {
    config: QueueConfig,
    state: Mutex<QueueState<Req, Resp>>,
    notify: Notify,
    semaphore: Arc<Semaphore>,
    configured_concurrency: AtomicU64,
    stats: Arc<QueueStats>,
    seq: AtomicU64,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl<Req, Resp> RequestQueue<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    pub fn new(config: QueueConfig) -> Arc<Self> {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent));
        let configured_concurrency = config.max_concurrent as u64;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Arc::new(Self {
            config,
            state: Mutex::new(QueueState { heap: BinaryHeap::new() }),
            notify: Notify::new(),
            semaphore,
            configured_concurrency: AtomicU64::new(configured_concurrency),
            stats: Arc::new(QueueStats::default()),
            seq: AtomicU64::new(0),
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn stats(&self) -> QueueStatsSnapshot {
        self.stats.snapshot()
    }

    /// Resizes the worker pool without interrupting in-flight work: growing
    /// simply adds permits; shrinking forgets permits as they're returned,
    /// draining naturally rather than preempting running workers (§4.5).
    pub fn update_concurrency(&self, target: usize) {
        let current = self.configured_concurrency.swap(target as u64, Ordering::SeqCst) as usize;
        if target > current {
            self.semaphore.add_permits(target - current);
        } else if target < current {
            self.semaphore.forget_permits(current - target);
        }
    }

    fn active_len(&self) -> usize {
        self.state.lock().expect("queue mutex poisoned").heap.len()
    }

    /// Admits the request, blocks until it completes or the queue timeout
    /// elapses, whichever is first (§4.5). Returns a structured rejection
    /// before ever touching the heap if admission fails.
    pub async fn enqueue(
        &self,
        payload: Req,
        priority: Priority,
        admission: &dyn AdmissionContext,
    ) -> Result<Resp, AppError> {
        if *self.shutdown_rx.borrow() {
            self.stats.on_reject();
            return Err(AppError::canceled("orchestrator is shutting down"));
        }
        if admission.current_level() == DegradationLevel::Emergency {
            self.stats.on_reject();
            return Err(AppError::degraded("queue rejects new admissions while in Emergency"));
        }
        if admission.available_memory_mb() < self.config.memory_threshold_mb {
            self.stats.on_reject();
            return Err(AppError::resource_exhausted("insufficient free memory to admit request"));
        }
        if self.active_len() >= self.config.max_queue_size {
            self.stats.on_reject();
            return Err(AppError::resource_exhausted("request queue is full"));
        }

        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let now = Instant::now();
        let cancellation = CancellationToken::new();

        let entry = QueueEntry {
            seq,
            priority,
            enqueued_at: now,
            deadline: now + self.config.queue_timeout,
            cancellation: cancellation.clone(),
            payload,
            reply_tx,
        };

        {
            let mut state = self.state.lock().expect("queue mutex poisoned");
            state.heap.push(Reverse(HeapItem(entry)));
        }
        self.stats.on_enqueue();
        self.notify.notify_one();

        match tokio::time::timeout(self.config.queue_timeout, reply_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                cancellation.cancel();
                Err(AppError::canceled("queue worker dropped without a reply"))
            }
            Err(_) => {
                cancellation.cancel();
                Err(AppError::timeout("request exceeded the queue timeout"))
            }
        }
    }

    fn pop_next(&self) -> Option<QueueEntry<Req, Resp>> {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        loop {
            let Reverse(HeapItem(entry)) = state.heap.pop()?;
            if entry.cancellation.is_cancelled() {
                continue; // dropped without invoking ProcessFunc (§4.5 Cancellation)
            }
            return Some(entry);
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// A receiver that resolves `changed()` once `begin_shutdown` fires,
    /// for an in-flight worker to race against while it runs `ProcessFunc`.
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Stops admitting, and immediately cancels every entry still sitting
    /// in the heap so its caller gets `Canceled` right away instead of
    /// blocking out to its own queue timeout (§9 graceful shutdown,
    /// Testable Property 13). In-flight work is left to the dispatcher's
    /// worker task, which races `ProcessFunc` against `subscribe_shutdown`.
    pub fn begin_shutdown(&self) {
        let drained: Vec<_> = {
            let mut state = self.state.lock().expect("queue mutex poisoned");
            state.heap.drain().collect()
        };

        for Reverse(HeapItem(entry)) in drained {
            entry.cancellation.cancel();
            self.stats.on_cancel();
            let _ = entry.reply_tx.send(Err(AppError::canceled("orchestrator is shutting down")));
        }

        let _ = self.shutdown_tx.send(true);
        self.notify.notify_waiters();
    }
}

/// Spawns the dispatcher loop: pulls admitted entries in priority order and
/// runs up to `MaxConcurrent` of them concurrently via the semaphore.
pub fn spawn_dispatcher<Req, Resp>(
    queue: Arc<RequestQueue<Req, Resp>>,
    process: ProcessFn<Req, Resp>,
) -> tokio::task::JoinHandle<()>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    tokio::spawn(async move {
        loop {
            // Acquire a worker slot *before* looking at the heap: popping first
            // would dequeue whatever is highest priority right now and pin it to
            // the next free slot, so a higher-priority entry that arrives while
            // we wait for a slot could never overtake an already-dequeued one
            // (§4.5 priority ordering, Testable Property 8).
            let permit = match Arc::clone(&queue.semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break, // semaphore closed: shutting down
            };

            let entry = loop {
                if let Some(entry) = queue.pop_next() {
                    break entry;
                }
                if queue.is_shutting_down() {
                    return; // heap drained by begin_shutdown, nothing left to dispatch
                }
                queue.notify.notified().await;
            };

            let queue = Arc::clone(&queue);
            let process = Arc::clone(&process);

            tokio::spawn(async move {
                let _permit = permit;
                queue.stats.on_dequeue();

                let wait = entry.enqueued_at.elapsed();
                let remaining = entry.deadline.saturating_duration_since(Instant::now());
                let run_start = Instant::now();

                let result = if entry.cancellation.is_cancelled() {
                    Err(AppError::canceled("request cancelled before processing"))
                } else if queue.is_shutting_down() {
                    Err(AppError::canceled("orchestrator is shutting down"))
                } else {
                    // Race ProcessFunc against a mid-flight shutdown so an
                    // already-running request is canceled within the graceful
                    // window instead of riding out to whatever the backend
                    // does once it gets torn down underneath it (§9 graceful
                    // shutdown, Testable Property 13).
                    let mut shutdown_rx = queue.subscribe_shutdown();
                    tokio::select! {
                        res = process(entry.payload, remaining) => res,
                        _ = shutdown_rx.changed() => Err(AppError::canceled("orchestrator is shutting down")),
                    }
                };

                let ok = result.is_ok();
                queue.stats.on_complete(ok, wait.as_micros() as u64, run_start.elapsed().as_micros() as u64);
                let _ = entry.reply_tx.send(result);
            });
        }
    })
}
