//! LRU Tracker Module
//!
//! Least Recently Used ordering shared by the caches and the rate limiter.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a monotonically increasing sequence
/// number. The smallest live stamp is the least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Key -> last access stamp
    stamps: HashMap<String, u64>,
    /// Access stamp -> key, oldest first
    order: BTreeMap<u64, String>,
    /// Next stamp to hand out
    next: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        let stamp = self.next;
        self.next += 1;

        match self.stamps.get_mut(key) {
            Some(previous) => {
                self.order.remove(previous);
                *previous = stamp;
            }
            None => {
                self.stamps.insert(key.to_string(), stamp);
            }
        }
        self.order.insert(stamp, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.order.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.first_key_value().map(|(_, key)| key.as_str())
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.stamps.clear();
        self.order.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.peek_oldest(), None);
    }

    #[test]
    fn test_lru_touch_existing_key() {
        let mut lru = LruTracker::new();

        lru.touch("stats:alice");
        lru.touch("stats:bob");
        lru.touch("stats:carol");

        // Re-touching alice makes bob the oldest
        lru.touch("stats:alice");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some("stats:bob"));
    }

    #[test]
    fn test_lru_evict_in_access_order() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");
        lru.touch("c");
        lru.touch("b");

        assert_eq!(lru.evict_oldest().as_deref(), Some("a"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("c"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("b"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();

        lru.touch("weather:london");
        lru.touch("weather:paris");
        lru.remove("weather:london");
        lru.remove("weather:nowhere");

        assert_eq!(lru.len(), 1);
        assert!(!lru.contains("weather:london"));
        assert_eq!(lru.peek_oldest(), Some("weather:paris"));
    }

    #[test]
    fn test_lru_touch_same_key_multiple_times() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key1");
        lru.touch("key1");

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest().as_deref(), Some("key1"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.clear();

        assert!(lru.is_empty());
        assert_eq!(lru.evict_oldest(), None);
    }
}
