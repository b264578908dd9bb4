// [libs/core/queue/tests/ordering_and_admission.rs]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aegis_core_queue::{spawn_dispatcher, AdmissionContext, AlwaysAdmit, QueueConfig, RequestQueue};
use aegis_domain_models::error::{AppError, ErrorKind};
use aegis_domain_models::level::DegradationLevel;
use aegis_domain_models::priority::Priority;

struct RejectingAdmission {
    level: DegradationLevel,
    available_mb: u64,
}

impl AdmissionContext for RejectingAdmission {
    fn current_level(&self) -> DegradationLevel {
        self.level
    }
    fn available_memory_mb(&self) -> u64 {
        self.available_mb
    }
}

#[tokio::test]
async fn high_priority_runs_before_normal_under_single_worker() {
    let queue = RequestQueue::<u32, u32>::new(QueueConfig { max_concurrent: 1, ..QueueConfig::default() });
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let order_clone = Arc::clone(&order);
    let process = Arc::new(move |payload: u32, _remaining: Duration| {
        let order = Arc::clone(&order_clone);
        Box::pin(async move {
            order.lock().unwrap().push(payload);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(payload)
        }) as aegis_core_queue::BoxFuture<Result<u32, AppError>>
    });

    let _dispatcher = spawn_dispatcher(Arc::clone(&queue), process);

    // Give the dispatcher a moment to block on its first pop so both
    // admissions land in the heap together.
    let q1 = Arc::clone(&queue);
    let low = tokio::spawn(async move { q1.enqueue(1, Priority::Low, &AlwaysAdmit).await });
    tokio::time::sleep(Duration::from_millis(5)).await;
    let q2 = Arc::clone(&queue);
    let high = tokio::spawn(async move { q2.enqueue(2, Priority::High, &AlwaysAdmit).await });

    let (low_result, high_result) = tokio::join!(low, high);
    assert_eq!(low_result.unwrap().unwrap(), 1);
    assert_eq!(high_result.unwrap().unwrap(), 2);

    let seen = order.lock().unwrap().clone();
    assert_eq!(seen[0], 1, "the first payload already in flight keeps running");
    assert_eq!(seen[1], 2, "the high-priority entry must be dequeued next, not the low one");
}

#[tokio::test]
async fn high_priority_overtakes_a_deep_backlog_of_low_priority_entries() {
    // S3: enqueue 10 Low, then 1 High, under a single worker. The worker is
    // already busy with the first Low when High arrives, so High must be the
    // *second* entry to complete, not buried behind the other nine Lows that
    // were sitting in the heap first.
    let queue = RequestQueue::<u32, u32>::new(QueueConfig { max_concurrent: 1, ..QueueConfig::default() });
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let order_clone = Arc::clone(&order);
    let process = Arc::new(move |payload: u32, _remaining: Duration| {
        let order = Arc::clone(&order_clone);
        Box::pin(async move {
            order.lock().unwrap().push(payload);
            tokio::time::sleep(Duration::from_millis(15)).await;
            Ok(payload)
        }) as aegis_core_queue::BoxFuture<Result<u32, AppError>>
    });
    let _dispatcher = spawn_dispatcher(Arc::clone(&queue), process);

    let mut handles = Vec::new();
    for i in 1..=10u32 {
        let q = Arc::clone(&queue);
        handles.push(tokio::spawn(async move { q.enqueue(i, Priority::Low, &AlwaysAdmit).await }));
        // Stagger slightly so payload 1 is already dequeued and running by the
        // time the rest land in the heap together.
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    let q_high = Arc::clone(&queue);
    let high = tokio::spawn(async move { q_high.enqueue(100, Priority::High, &AlwaysAdmit).await });

    for h in handles {
        assert!(h.await.unwrap().is_ok());
    }
    assert!(high.await.unwrap().is_ok());

    let seen = order.lock().unwrap().clone();
    assert_eq!(seen[0], 1, "the first low-priority entry was already in flight");
    assert_eq!(seen[1], 100, "high priority must overtake the remaining low-priority backlog");
}

#[tokio::test]
async fn emergency_level_rejects_admission_without_touching_the_heap() {
    let queue = RequestQueue::<u32, u32>::new(QueueConfig::default());
    let admission = RejectingAdmission { level: DegradationLevel::Emergency, available_mb: u64::MAX };

    let err = queue.enqueue(1, Priority::Normal, &admission).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Degraded);
    assert_eq!(queue.stats().rejected, 1);
    assert_eq!(queue.stats().queued, 0);
}

#[tokio::test]
async fn low_available_memory_rejects_admission() {
    let queue = RequestQueue::<u32, u32>::new(QueueConfig { memory_threshold_mb: 1024, ..QueueConfig::default() });
    let admission = RejectingAdmission { level: DegradationLevel::Normal, available_mb: 10 };

    let err = queue.enqueue(1, Priority::Normal, &admission).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceExhausted);
}

#[tokio::test]
async fn full_queue_rejects_further_admission() {
    let queue = RequestQueue::<u32, u32>::new(QueueConfig { max_concurrent: 1, max_queue_size: 1, ..QueueConfig::default() });

    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);
    let process = Arc::new(move |payload: u32, _remaining: Duration| {
        let counter = Arc::clone(&counter_clone);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(payload)
        }) as aegis_core_queue::BoxFuture<Result<u32, AppError>>
    });
    let _dispatcher = spawn_dispatcher(Arc::clone(&queue), process);

    let q1 = Arc::clone(&queue);
    let first = tokio::spawn(async move { q1.enqueue(1, Priority::Normal, &AlwaysAdmit).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let q2 = Arc::clone(&queue);
    let second = tokio::spawn(async move { q2.enqueue(2, Priority::Normal, &AlwaysAdmit).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let rejected = queue.enqueue(3, Priority::Normal, &AlwaysAdmit).await;
    assert_eq!(rejected.unwrap_err().kind, ErrorKind::ResourceExhausted);

    let (first_result, second_result) = tokio::join!(first, second);
    assert!(first_result.unwrap().is_ok());
    assert!(second_result.unwrap().is_ok());
}

#[tokio::test]
async fn shutdown_cancels_a_queued_entry_immediately() {
    let queue = RequestQueue::<u32, u32>::new(QueueConfig { max_concurrent: 1, ..QueueConfig::default() });

    let process = Arc::new(move |payload: u32, _remaining: Duration| {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(payload)
        }) as aegis_core_queue::BoxFuture<Result<u32, AppError>>
    });
    let _dispatcher = spawn_dispatcher(Arc::clone(&queue), process);

    let q1 = Arc::clone(&queue);
    let running = tokio::spawn(async move { q1.enqueue(1, Priority::Normal, &AlwaysAdmit).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let q2 = Arc::clone(&queue);
    let queued = tokio::spawn(async move { q2.enqueue(2, Priority::Normal, &AlwaysAdmit).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    queue.begin_shutdown();

    let queued_result = tokio::time::timeout(Duration::from_secs(1), queued)
        .await
        .expect("a backlog entry must be canceled well within the queue timeout")
        .unwrap();
    assert_eq!(queued_result.unwrap_err().kind, ErrorKind::Canceled);

    // The entry already running against `process` is left to the dispatcher's
    // own shutdown race and is not asserted on here; `60s` sleep would only
    // resolve via that race, not naturally.
    running.abort();
}

#[tokio::test]
async fn shutdown_cancels_an_in_flight_entry() {
    let queue = RequestQueue::<u32, u32>::new(QueueConfig { max_concurrent: 1, ..QueueConfig::default() });

    let process = Arc::new(move |payload: u32, _remaining: Duration| {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(payload)
        }) as aegis_core_queue::BoxFuture<Result<u32, AppError>>
    });
    let _dispatcher = spawn_dispatcher(Arc::clone(&queue), process);

    let q1 = Arc::clone(&queue);
    let running = tokio::spawn(async move { q1.enqueue(1, Priority::Normal, &AlwaysAdmit).await });
    // Give the dispatcher time to dequeue and start `process` before we pull
    // the shutdown lever.
    tokio::time::sleep(Duration::from_millis(20)).await;

    queue.begin_shutdown();

    let result = tokio::time::timeout(Duration::from_secs(1), running)
        .await
        .expect("an in-flight entry must be canceled well within the graceful window")
        .unwrap();
    assert_eq!(result.unwrap_err().kind, ErrorKind::Canceled);
}

#[tokio::test]
async fn enqueue_after_shutdown_is_rejected_immediately() {
    let queue = RequestQueue::<u32, u32>::new(QueueConfig::default());
    queue.begin_shutdown();

    let err = queue.enqueue(1, Priority::Normal, &AlwaysAdmit).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Canceled);
}
