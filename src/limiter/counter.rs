//! Token Counter Module
//!
//! Usage count for one token within its current window.

// == Token Counter ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCounter {
    /// Uses recorded since the window opened
    pub count: u32,
    /// When the window opened (Unix milliseconds)
    pub window_started_at: u64,
}

impl TokenCounter {
    /// Opens a fresh window at `now_ms` with no recorded uses.
    pub fn new(now_ms: u64) -> Self {
        Self {
            count: 0,
            window_started_at: now_ms,
        }
    }

    /// True once `interval_ms` has fully elapsed since the window opened.
    pub fn is_expired(&self, now_ms: u64, interval_ms: u64) -> bool {
        now_ms.saturating_sub(self.window_started_at) > interval_ms
    }

    /// Records one use. Saturates instead of wrapping.
    pub fn increment(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Milliseconds until the window closes.
    pub fn remaining_ms(&self, now_ms: u64, interval_ms: u64) -> u64 {
        interval_ms.saturating_sub(now_ms.saturating_sub(self.window_started_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_window() {
        let counter = TokenCounter::new(1_000);

        assert!(!counter.is_expired(61_000, 60_000));
        assert!(counter.is_expired(61_001, 60_000));
        assert_eq!(counter.remaining_ms(31_000, 60_000), 30_000);
        assert_eq!(counter.remaining_ms(90_000, 60_000), 0);
    }

    #[test]
    fn test_counter_increment_saturates() {
        let mut counter = TokenCounter::new(0);
        assert_eq!(counter.increment(), 1);

        counter.count = u32::MAX;
        assert_eq!(counter.increment(), u32::MAX);
    }
}
