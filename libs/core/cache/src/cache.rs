// [libs/core/cache/src/cache.rs]
//! Response Cache (C6) table: bounded entries, TTL, and eviction (§4.3).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::entry::CacheEntry;
use crate::fingerprint::fingerprint;

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub capacity: usize,
    pub base_ttl: Duration,
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 1000, base_ttl: Duration::from_secs(3600), cleanup_interval: Duration::from_secs(15 * 60) }
    }
}

#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct ResponseCache {
    table: RwLock<HashMap<String, Arc<CacheEntry>>>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { table: RwLock::new(HashMap::new()), config, hits: AtomicU64::new(0), misses: AtomicU64::new(0) }
    }

    /// `Get`: never returns an expired entry. A miss still needs only the
    /// read lock; hit-counter updates use interior atomics so `Get` never
    /// blocks on the table's write lock.
    pub fn get(&self, model: &str, prompt: &str, params: &[(&str, &str)]) -> Option<String> {
        let key = fingerprint(model, prompt, params);
        let table = self.table.read().expect("cache table lock poisoned");

        match table.get(&key) {
            Some(entry) if !entry.is_expired(Instant::now()) => {
                entry.record_hit();
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.response.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn set(&self, model: &str, prompt: &str, params: &[(&str, &str)], text: String) {
        self.set_with_ttl(model, prompt, params, text, self.config.base_ttl);
    }

    /// Explicit TTL override — used by the Orchestrator to scale TTL by the
    /// current degradation level's `cache_ttl_factor` (§9 Supplemented
    /// Features).
    pub fn set_with_ttl(&self, model: &str, prompt: &str, params: &[(&str, &str)], text: String, ttl: Duration) {
        let key = fingerprint(model, prompt, params);
        let now = Instant::now();
        let entry = Arc::new(CacheEntry::new(text, now, ttl));

        let mut table = self.table.write().expect("cache table lock poisoned");
        if table.len() >= self.config.capacity && !table.contains_key(&key) {
            if let Some(evict_key) = pick_eviction_candidate(&table, now) {
                table.remove(&evict_key);
            }
        }
        table.insert(key, entry);
    }

    /// Removes every expired entry. Invoked on a periodic background task
    /// (§4.3: "default 15 min").
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut table = self.table.write().expect("cache table lock poisoned");
        let before = table.len();
        table.retain(|_, entry| !entry.is_expired(now));
        before - table.len()
    }

    pub fn clear(&self) {
        let mut table = self.table.write().expect("cache table lock poisoned");
        table.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        let table = self.table.read().expect("cache table lock poisoned");
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: table.len(),
        }
    }
}

/// Expired first; else lowest hit-count; ties broken by earliest creation
/// time (§4.3).
fn pick_eviction_candidate(table: &HashMap<String, Arc<CacheEntry>>, now: Instant) -> Option<String> {
    if let Some((key, _)) = table.iter().find(|(_, entry)| entry.is_expired(now)) {
        return Some(key.clone());
    }

    table
        .iter()
        .min_by(|(_, a), (_, b)| {
            a.hit_count().cmp(&b.hit_count()).then(a.created_at.cmp(&b.created_at))
        })
        .map(|(key, _)| key.clone())
}
