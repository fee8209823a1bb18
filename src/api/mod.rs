//! API Module
//!
//! HTTP handlers and routing for the portfolio backend.
//!
//! # Endpoints
//! - `GET /api/github/stats?username=` - Profile statistics (24h cache)
//! - `GET /api/github/contributions?username=` - Contribution calendar (1h cache)
//! - `GET /api/github/commit?owner=&repo=` - Latest commit (1h cache)
//! - `GET /api/weather?city=` or `?lat=&lon=` - Current weather (30min cache)
//! - `POST /api/contact` - Rate-limited contact form
//! - `GET /api/cache/stats` - Cache and limiter statistics
//! - `POST /api/cache/sweep` - Drop expired entries (admin)
//! - `DELETE /api/cache` - Drop all entries (admin)
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;
pub mod state;

pub use handlers::*;
pub use routes::create_router;
pub use state::{AppState, Caches, SharedCache};
