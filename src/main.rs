//! Folio Edge - backend for a personal portfolio site
//!
//! Serves cached GitHub and weather data and a rate-limited contact form.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_edge::{api::create_router, spawn_sweep_task, AppState, Config};

/// Main entry point for the portfolio backend.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build caches, rate limiter and upstream clients
/// 4. Start background expiry sweep task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_edge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio Edge");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, ttls={}s/{}s/{}s, contact_limit={}/{}s, sweep_interval={}s",
        config.server_port,
        config.github_stats_ttl,
        config.github_activity_ttl,
        config.weather_ttl,
        config.contact_rate_limit,
        config.contact_rate_interval,
        config.sweep_interval
    );
    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN not set, GitHub stats and contributions will answer 503");
    }
    if config.openweather_api_key.is_none() {
        warn!("OPENWEATHER_API_KEY not set, weather will answer 503");
    }

    let state = AppState::from_config(&config);
    info!("Caches and rate limiter initialized");

    let sweep_handle = spawn_sweep_task(
        state.caches.clone(),
        state.limiter.clone(),
        config.sweep_interval,
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the sweep task.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweep_handle.abort();
    warn!("Sweep task aborted");
}
