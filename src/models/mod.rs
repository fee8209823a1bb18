//! Request and Response models for the portfolio API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! payload types held in the caches.

pub mod payloads;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use payloads::{
    CommitInfo, ContributionCalendar, ContributionDay, ContributionWeek, GitHubStats,
    LanguageShare, WeatherSnapshot,
};
pub use requests::{CommitQuery, ContactRequest, UserQuery, WeatherParams, WeatherQuery};
pub use responses::{
    CacheStatsView, CachedResponse, ClearResponse, ContactResponse, HealthResponse,
    LimiterStatsView, StatsResponse, SweepResponse,
};
