//! Error types for the portfolio backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::contact::ContactError;
use crate::limiter::RateLimitExceeded;
use crate::upstream::UpstreamError;

// == API Error Enum ==
/// Error type returned by every handler.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream reported the subject does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or wrong admin credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Caller exhausted its rate limit
    #[error("Too many requests, try again in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Upstream provider failed. Details are logged, never returned.
    #[error("Upstream provider failed")]
    Upstream,

    /// Feature disabled by missing configuration
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Conversions ==
impl From<RateLimitExceeded> for ApiError {
    fn from(err: RateLimitExceeded) -> Self {
        ApiError::RateLimited {
            retry_after_secs: err.retry_after_ms.div_ceil(1000),
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound(what) => ApiError::NotFound(what),
            UpstreamError::MissingCredentials(what) => ApiError::Unavailable(format!(
                "{what} is not configured"
            )),
            other => {
                tracing::warn!("Upstream provider failed: {}", other);
                ApiError::Upstream
            }
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Invalid(msg) => ApiError::InvalidRequest(msg),
            // Storage details stay in the logs
            other => {
                tracing::error!("Failed to store contact message: {}", other);
                ApiError::Internal("Failed to send message".to_string())
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        let mut response = (status, body).into_response();
        if let ApiError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
