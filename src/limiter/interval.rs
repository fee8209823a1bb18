//! Interval Rate Limiter Module
//!
//! Counts uses per token in fixed windows that open on a token's first use.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cache::LruTracker;
use crate::clock::{Clock, SystemClock};
use crate::limiter::TokenCounter;

// == Rate Limit Error ==
/// Returned by [`IntervalRateLimiter::check`] once a token reaches its limit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Rate limit exceeded: {count} uses against a limit of {limit}")]
pub struct RateLimitExceeded {
    /// Uses recorded in the current window, including this one
    pub count: u32,
    /// Limit the caller asked for
    pub limit: u32,
    /// Milliseconds until the window resets
    pub retry_after_ms: u64,
}

// == Interval Rate Limiter ==
/// Fixed-window limiter keyed by token, bounded to `max_tokens` counters.
///
/// A counter is created on first use and discarded once `interval` has
/// elapsed since then. Beyond `max_tokens` the least recently checked
/// token is forgotten.
#[derive(Debug)]
pub struct IntervalRateLimiter {
    counters: HashMap<String, TokenCounter>,
    lru: LruTracker,
    interval: Duration,
    max_tokens: usize,
    clock: Arc<dyn Clock>,
}

impl IntervalRateLimiter {
    // == Constructor ==
    pub fn new(interval: Duration, max_tokens: usize) -> Self {
        Self::with_clock(interval, max_tokens, Arc::new(SystemClock))
    }

    /// `max_tokens` is clamped to at least one.
    pub fn with_clock(interval: Duration, max_tokens: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            counters: HashMap::new(),
            lru: LruTracker::new(),
            interval,
            max_tokens: max_tokens.max(1),
            clock,
        }
    }

    // == Check ==
    /// Records one use of `token` and decides whether it is allowed.
    ///
    /// The count is incremented on every call, rejected ones included, so a
    /// blocked token stays blocked until its window closes. Returns the
    /// post-increment count when allowed.
    pub fn check(&mut self, limit: u32, token: &str) -> Result<u32, RateLimitExceeded> {
        let now = self.clock.now_ms();
        let interval_ms = self.interval_ms();

        let stale = self
            .counters
            .get(token)
            .is_some_and(|counter| counter.is_expired(now, interval_ms));
        if stale {
            self.remove_token(token);
        }

        if !self.counters.contains_key(token) && self.counters.len() >= self.max_tokens {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.counters.remove(&oldest);
            }
        }
        self.lru.touch(token);

        let counter = self
            .counters
            .entry(token.to_string())
            .or_insert_with(|| TokenCounter::new(now));
        let count = counter.increment();

        if count >= limit {
            Err(RateLimitExceeded {
                count,
                limit,
                retry_after_ms: counter.remaining_ms(now, interval_ms),
            })
        } else {
            Ok(count)
        }
    }

    // == Usage ==
    /// Current count for `token` without recording a use.
    #[cfg(test)]
    pub fn usage(&self, token: &str) -> u32 {
        let now = self.clock.now_ms();
        self.counters
            .get(token)
            .filter(|counter| !counter.is_expired(now, self.interval_ms()))
            .map_or(0, |counter| counter.count)
    }

    // == Sweep Expired ==
    /// Drops every counter whose window has closed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let interval_ms = self.interval_ms();

        let expired: Vec<String> = self
            .counters
            .iter()
            .filter(|(_, counter)| counter.is_expired(now, interval_ms))
            .map(|(token, _)| token.clone())
            .collect();

        for token in &expired {
            self.remove_token(token);
        }
        expired.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of tracked tokens, including ones whose window has closed.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    fn remove_token(&mut self, token: &str) {
        self.counters.remove(token);
        self.lru.remove(token);
    }

    fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }
}
