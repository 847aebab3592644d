//! kvserved - a cached key-value HTTP service
//!
//! Serves per-key reads, writes, and deletes over HTTP with a sharded
//! in-memory LRU cache in front of a MySQL table.

use std::net::SocketAddr;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kvserved::api::create_router;
use kvserved::store::MysqlBackend;
use kvserved::{AppState, Config, KvService};

/// Main entry point for the key-value service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the MySQL backend and ensure the table exists
/// 4. Open the session pool and start the worker pool
/// 5. Create the Axum router with all endpoints
/// 6. Start the HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kvserved=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting kvserved");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, shards={}, pool={}, workers={}, port={}",
        config.cache_capacity,
        config.cache_shards,
        config.pool_size,
        config.worker_threads,
        config.server_port
    );

    // Connect the backend and make sure the table exists
    let backend = match MysqlBackend::from_config(&config) {
        Ok(backend) => backend,
        Err(err) => {
            error!("Invalid database configuration: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = backend.ensure_schema() {
        error!("Failed to prepare database schema: {err}");
        std::process::exit(1);
    }

    // Open the session pool and start the workers
    let service = match KvService::new(backend, &config) {
        Ok(service) => service,
        Err(err) => {
            error!("Failed to start service: {err}");
            std::process::exit(1);
        }
    };
    let state = AppState::new(service);
    info!("Session pool and worker pool initialized");

    // Create router with all endpoints
    let app = create_router(state.clone());

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // Drain the worker pool before exiting
    state.service.shutdown();
    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
