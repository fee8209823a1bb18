//! TTL Cache Module
//!
//! Keyed store that treats entries older than a fixed TTL as absent.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::clock::{Clock, SystemClock};

// == TTL Cache ==
/// In-memory cache with lazy TTL expiry and an optional LRU size bound.
///
/// Expired entries stay in memory until they are read, swept with
/// [`TtlCache::sweep_expired`], or pushed out by the size bound.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Access order for the size bound
    lru: LruTracker,
    stats: CacheStats,
    /// Lifetime of every entry
    ttl: Duration,
    /// `None` keeps the cache unbounded
    max_entries: Option<usize>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an unbounded cache driven by the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, None, Arc::new(SystemClock))
    }

    /// Creates a cache with an explicit size bound and time source.
    ///
    /// A `max_entries` of `Some(0)` is treated as unbounded.
    pub fn with_clock(ttl: Duration, max_entries: Option<usize>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            ttl,
            max_entries: max_entries.filter(|max| *max > 0),
            clock,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and within its TTL.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let ttl_ms = self.ttl_ms();

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now, ttl_ms),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key` stamped with the current time, replacing
    /// any previous entry.
    ///
    /// When the cache is bounded and `key` is new, the least recently used
    /// entry is dropped first to make room.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = self.clock.now_ms();

        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                if let Some(oldest) = self.lru.evict_oldest() {
                    self.entries.remove(&oldest);
                    self.stats.record_eviction();
                }
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, now));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Clear ==
    /// Drops every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
        removed
    }

    // == Sweep Expired ==
    /// Removes every expired entry. Returns how many were removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let ttl_ms = self.ttl_ms();

        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }

    fn ttl_ms(&self) -> u64 {
        self.ttl.as_millis() as u64
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn cache_at(ttl_ms: u64, max: Option<usize>) -> (TtlCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::with_clock(Duration::from_millis(ttl_ms), max, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_cache_new() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(60));
        assert!(cache.is_empty());
        assert_eq!(cache.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_set_and_get() {
        let (mut cache, _) = cache_at(1_000, None);

        cache.set("stats:octocat", "v1".to_string());

        assert_eq!(cache.get("stats:octocat").as_deref(), Some("v1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_missing_key() {
        let (mut cache, _) = cache_at(1_000, None);
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_overwrite_last_write_wins() {
        let (mut cache, _) = cache_at(1_000, None);

        cache.set("k", "v1".to_string());
        cache.set("k", "v2".to_string());

        assert_eq!(cache.get("k").as_deref(), Some("v2"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_restarts_ttl() {
        let (mut cache, clock) = cache_at(1_000, None);

        cache.set("k", "v1".to_string());
        clock.set(800);
        cache.set("k", "v2".to_string());
        clock.set(1_500);

        assert_eq!(cache.get("k").as_deref(), Some("v2"));
    }

    #[test]
    fn test_expiry_scenario() {
        let (mut cache, clock) = cache_at(1_000, None);

        cache.set("a", "{x:1}".to_string());

        clock.set(500);
        assert_eq!(cache.get("a").as_deref(), Some("{x:1}"));

        clock.set(1_500);
        assert_eq!(cache.get("a"), None);
        // Lazily removed on the expired read
        assert!(cache.is_empty());
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_expiry_boundary() {
        let (mut cache, clock) = cache_at(1_000, None);

        cache.set("a", "v".to_string());

        clock.set(1_000);
        assert!(cache.get("a").is_some(), "exactly ttl is still valid");

        clock.set(1_001);
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_expired_entries_linger_until_read() {
        let (mut cache, clock) = cache_at(1_000, None);

        cache.set("a", "v".to_string());
        clock.set(5_000);

        assert_eq!(cache.len(), 1);
        cache.get("a");
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_sweep_expired() {
        let (mut cache, clock) = cache_at(1_000, None);

        cache.set("old", "v".to_string());
        clock.set(600);
        cache.set("new", "v".to_string());
        clock.set(1_200);

        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new").is_some());
        assert_eq!(cache.sweep_expired(), 0);
    }

    #[test]
    fn test_clear() {
        let (mut cache, _) = cache_at(1_000, None);

        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_unbounded_by_default() {
        let (mut cache, _) = cache_at(1_000, None);

        for i in 0..5_000 {
            cache.set(format!("key{i}"), i.to_string());
        }

        assert_eq!(cache.len(), 5_000);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_zero_bound_means_unbounded() {
        let (mut cache, _) = cache_at(1_000, Some(0));

        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_eviction() {
        let (mut cache, _) = cache_at(1_000, Some(3));

        cache.set("key1", "1".to_string());
        cache.set("key2", "2".to_string());
        cache.set("key3", "3".to_string());
        cache.set("key4", "4".to_string());

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("key1"), None);
        assert!(cache.get("key4").is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_lru_touch_on_get() {
        let (mut cache, _) = cache_at(1_000, Some(3));

        cache.set("key1", "1".to_string());
        cache.set("key2", "2".to_string());
        cache.set("key3", "3".to_string());

        cache.get("key1");
        cache.set("key4", "4".to_string());

        assert!(cache.get("key1").is_some());
        assert_eq!(cache.get("key2"), None);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let (mut cache, _) = cache_at(1_000, Some(2));

        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.set("a", "3".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn test_stats() {
        let (mut cache, _) = cache_at(1_000, None);

        cache.set("key1", "value1".to_string());
        cache.get("key1");
        cache.get("nonexistent");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
