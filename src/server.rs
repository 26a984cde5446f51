//! HTTP server initialization and runtime setup.
//!
//! Handles store connection setup, warm-up, and Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::store::{ConnectionManager, MemoryStore, RedisConnector, StoreConnector};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Builds the store connector selected by `STORE_BACKEND`.
///
/// # Errors
///
/// Returns an error if the Redis URL cannot be parsed.
pub fn build_connector(config: &Config) -> Result<Arc<dyn StoreConnector>> {
    if config.store_backend == "memory" {
        tracing::warn!("Using in-memory store; links are not shared between processes");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let connector = RedisConnector::new(
        &config.redis_url,
        config.store_connect_timeout(),
        config.store_io_timeout(),
    )
    .context("Invalid Redis configuration")?;

    Ok(Arc::new(connector))
}

/// Opens the first store connection, retrying with exponential backoff.
///
/// Returns `false` if every attempt failed. The manager keeps reconnecting
/// lazily on later requests, so this never prevents startup.
pub async fn warm_up(manager: &ConnectionManager, attempts: usize) -> bool {
    // 200ms, 400ms, 800ms, ... capped at 2s
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(attempts.saturating_sub(1));

    match Retry::start(strategy, || manager.acquire()).await {
        Ok(_) => {
            tracing::info!("Connected to store");
            true
        }
        Err(e) => {
            tracing::warn!(
                attempts,
                error = %e,
                "Store unreachable at startup; will retry on demand"
            );
            false
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Store connector and connection manager
/// - Startup connection attempts (non-fatal)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The store configuration is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let connector = build_connector(&config)?;
    let manager = Arc::new(ConnectionManager::new(connector));

    warm_up(&manager, config.store_startup_attempts).await;

    let state = AppState::new(manager, config.link_settings());

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::StoreError;
    use crate::infrastructure::store::{ConnectionState, MockStoreConnector};

    fn config(backend: &str, redis_url: &str) -> Config {
        Config {
            redis_url: redis_url.to_string(),
            store_backend: backend.to_string(),
            listen_addr: "127.0.0.1:0".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            store_connect_timeout_ms: 100,
            store_io_timeout_ms: 100,
            store_startup_attempts: 1,
            base_domain: "short.ly".to_string(),
            short_code_length: 6,
            link_ttl_seconds: 86_400,
            code_allocation_attempts: 5,
        }
    }

    #[tokio::test]
    async fn test_memory_backend_connects() {
        let connector = build_connector(&config("memory", "")).unwrap();
        let manager = ConnectionManager::new(connector);

        assert!(warm_up(&manager, 1).await);
        assert_eq!(manager.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_invalid_redis_url() {
        assert!(build_connector(&config("redis", "not a url")).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_warm_up_retries_then_gives_up() {
        let mut connector = MockStoreConnector::new();
        connector
            .expect_connect()
            .times(3)
            .returning(|| Err(StoreError::Connection("connection refused".to_string())));
        let manager = ConnectionManager::new(Arc::new(connector));

        assert!(!warm_up(&manager, 3).await);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }
}
