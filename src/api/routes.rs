//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, commit_handler, contact_handler, contributions_handler, github_stats_handler,
    health_handler, stats_handler, sweep_handler, weather_handler,
};
use super::state::AppState;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin so the site can be served from a separate host
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/github/stats", get(github_stats_handler))
        .route("/api/github/contributions", get(contributions_handler))
        .route("/api/github/commit", get(commit_handler))
        .route("/api/weather", get(weather_handler))
        .route("/api/contact", post(contact_handler))
        .route("/api/cache", delete(clear_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/cache/sweep", post(sweep_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_header_present() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_weather_without_api_key_is_unavailable() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/weather?city=London")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_contact_rejects_non_json() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .body(Body::from("name=Ada"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
