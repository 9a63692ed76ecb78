//! Resilient Cache - user service with a self-healing cache layer
//!
//! Serves a small user API whose lookups are memoized in either an
//! in-process store or a Redis-backed store.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resilient_cache::api::{create_router, AppState};
use resilient_cache::cache::CacheBackend;
use resilient_cache::config::{CacheDriver, Config};

/// Main entry point for the server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the configured cache store (connection happens in the background)
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. On SIGINT/SIGTERM, stop serving and tear the cache down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resilient_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resilient Cache server");

    let config = Config::from_env();
    info!(
        driver = ?config.cache_driver,
        default_ttl = ?config.default_ttl,
        port = config.server_port,
        "Configuration loaded"
    );
    if config.cache_driver == CacheDriver::Redis {
        info!(
            max_attempts = config.reconnect.max_attempts,
            retry_delay = ?config.reconnect.retry_delay,
            reconnect_interval = ?config.reconnect.periodic_interval(),
            "Remote cache reconnection policy"
        );
    }

    // One store for the whole process
    let cache = CacheBackend::from_config(&config);
    let state = AppState::with_cache(cache.store());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    cache.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
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
                warn!(error = %err, "Failed to install SIGTERM handler");
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
}
