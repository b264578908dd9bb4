// [libs/core/cache/src/entry.rs]
//! Cache entry (§3 Cache entry). Immutable after insert except the hit
//! counter, which is updated without the table's write lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub struct CacheEntry {
    pub response: String,
    pub created_at: Instant,
    pub expires_at: Instant,
    hits: AtomicU64,
}

impl CacheEntry {
    pub fn new(response: String, created_at: Instant, ttl: std::time::Duration) -> Self {
        Self { response, created_at, expires_at: created_at + ttl, hits: AtomicU64::new(0) }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}
