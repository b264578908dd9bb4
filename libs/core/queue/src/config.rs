// [libs/core/queue/src/config.rs]
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub max_concurrent: usize,
    pub max_queue_size: usize,
    pub memory_threshold_mb: u64,
    pub queue_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            max_queue_size: 256,
            memory_threshold_mb: 512,
            queue_timeout: Duration::from_secs(120),
        }
    }
}
