// [libs/core/cache/src/lib.rs]
//! Response Cache (C6): deterministic fingerprinting, TTL + bounded-LRU-ish
//! eviction, and a periodic expired-entry sweep.

pub mod cache;
pub mod entry;
pub mod fingerprint;

pub use cache::{CacheConfig, CacheStats, ResponseCache};
pub use fingerprint::fingerprint;

use std::sync::Arc;
use tokio::task::JoinHandle;

/// Spawns the periodic cleanup task (§4.3: "default 15 min"). The returned
/// handle can be aborted on shutdown.
pub fn spawn_cleanup_task(cache: Arc<ResponseCache>, interval: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = cache.cleanup_expired();
            if removed > 0 {
                tracing::debug!(target: "response_cache", removed, "swept expired cache entries");
            }
        }
    })
}
