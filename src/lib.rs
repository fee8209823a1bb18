//! Folio Edge - backend for a personal portfolio site
//!
//! Proxies GitHub and OpenWeatherMap behind in-memory TTL caches and accepts
//! contact-form submissions behind a per-caller rate limiter.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod contact;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
