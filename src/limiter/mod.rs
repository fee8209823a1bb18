//! Rate Limiter Module
//!
//! Keyed fixed-window counters guarding the contact form.

mod counter;
mod interval;


pub use counter::TokenCounter;
pub use interval::{IntervalRateLimiter, RateLimitExceeded};

use std::time::Duration;

// == Public Constants ==
/// Default window length
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Default number of distinct tokens tracked at once
pub const DEFAULT_MAX_TOKENS: usize = 500;
