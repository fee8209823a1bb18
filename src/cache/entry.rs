//! Cache Entry Module
//!
//! A stored value plus the time it was inserted.

// == Cache Entry ==
/// Represents a single cache entry with its insertion timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped at `now_ms`.
    pub fn new(value: V, now_ms: u64) -> Self {
        Self {
            value,
            stored_at: now_ms,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since insertion. A clock that moved backwards
    /// yields zero.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.stored_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl_ms`.
    ///
    /// Boundary condition: an entry whose age is exactly `ttl_ms` is still
    /// valid. Only an age strictly greater than the TTL expires it.
    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_ms(now_ms) > ttl_ms
    }
}
