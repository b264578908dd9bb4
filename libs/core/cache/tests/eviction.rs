// [libs/core/cache/tests/eviction.rs]
use aegis_core_cache::{CacheConfig, ResponseCache};
use std::time::Duration;

#[test]
fn get_returns_exactly_the_set_text() {
    let cache = ResponseCache::new(CacheConfig::default());
    cache.set("llama", "hello", &[("temperature", "0")], "world".to_string());
    let got = cache.get("llama", "hello", &[("temperature", "0")]);
    assert_eq!(got, Some("world".to_string()));
}

#[test]
fn get_never_returns_an_expired_entry() {
    let cache = ResponseCache::new(CacheConfig::default());
    cache.set_with_ttl("llama", "hello", &[], "world".to_string(), Duration::from_millis(1));
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(cache.get("llama", "hello", &[]), None);
}

#[test]
fn set_at_capacity_evicts_lowest_hit_count_entry() {
    let config = CacheConfig { capacity: 2, base_ttl: Duration::from_secs(3600), cleanup_interval: Duration::from_secs(900) };
    let cache = ResponseCache::new(config);

    cache.set("m", "a", &[], "a-resp".to_string());
    cache.set("m", "b", &[], "b-resp".to_string());

    // Hit "a" several times so "b" has the lowest hit count.
    for _ in 0..3 {
        cache.get("m", "a", &[]);
    }

    cache.set("m", "c", &[], "c-resp".to_string());

    assert_eq!(cache.get("m", "a", &[]), Some("a-resp".to_string()));
    assert_eq!(cache.get("m", "b", &[]), None, "lowest hit-count entry should have been evicted");
    assert_eq!(cache.get("m", "c", &[]), Some("c-resp".to_string()));
}

#[test]
fn cleanup_expired_removes_only_expired_entries() {
    let cache = ResponseCache::new(CacheConfig::default());
    cache.set_with_ttl("m", "short", &[], "s".to_string(), Duration::from_millis(1));
    cache.set_with_ttl("m", "long", &[], "l".to_string(), Duration::from_secs(3600));

    std::thread::sleep(Duration::from_millis(20));
    let removed = cache.cleanup_expired();
    assert_eq!(removed, 1);
    assert_eq!(cache.stats().entries, 1);
}

#[test]
fn clear_resets_counters_and_entries() {
    let cache = ResponseCache::new(CacheConfig::default());
    cache.set("m", "a", &[], "x".to_string());
    cache.get("m", "a", &[]);
    cache.get("m", "missing", &[]);

    cache.clear();
    let stats = cache.stats();
    assert_eq!(stats.entries, 0);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
}
