//! KV Gateway - HTTP access to a Redis store
//!
//! Binary entry point: acquires the store connection, serves the API, and
//! releases the connection on the way out.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kv_gateway::api::create_router;
use kv_gateway::{spawn_health_check_task, AppState, Config, KvStore, RedisStore};

/// Main entry point for the gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to the store (fatal on failure)
/// 4. Start background health check task
/// 5. Serve the router until SIGINT/SIGTERM
/// 6. Stop the health check and release the store connection
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kv_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting KV Gateway");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: port={}, connect_timeout={:?}, health_check_interval={}s",
        config.server_port, config.connect_timeout, config.health_check_interval
    );

    let store: Arc<dyn KvStore> = Arc::new(
        RedisStore::connect(&config)
            .await
            .context("failed to connect to the store")?,
    );

    let health_handle = spawn_health_check_task(
        store.clone(),
        Duration::from_secs(config.health_check_interval),
    );

    let served = serve(&config, AppState::from_shared(store.clone())).await;

    if let Some(handle) = health_handle {
        handle.abort();
        // Wait for the task to drop its clone of the store handle.
        let _ = handle.await;
    }
    // Handlers hold clones of the handle; they are gone once the server returns.
    drop(store);
    info!("Store connection released");

    if let Err(e) = &served {
        error!("Server stopped with error: {:#}", e);
    }
    served
}

/// Binds the listener and serves the API until a shutdown signal arrives.
async fn serve(config: &Config, state: AppState) -> Result<()> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
