use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use client_registry::store::MongoClientStore;
use client_registry::{AppState, Config, build_router, metrics, utils};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!(
        "Starting Client Registry v{}",
        env!("CARGO_PKG_VERSION")
    );

    match run().await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

/// Run the application, returning an exit code on error.
async fn run() -> Result<(), exitcode::ExitCode> {
    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {e}");
        exitcode::CONFIG
    })?;
    info!(
        host = %config.host,
        port = %config.port,
        database = %config.mongodb_database,
        collection = %config.mongodb_collection,
        "Configuration loaded"
    );

    // Start metrics exporter
    if let Some(metrics_addr) = config.metrics_addr() {
        metrics::try_init_metrics(metrics_addr);
    }

    // Connect to the document store. Serving without a backing store is
    // pointless, so a connection failure here is fatal.
    info!("Connecting to MongoDB...");
    let store = MongoClientStore::connect(&config).await.map_err(|e| {
        error!("Failed to connect to MongoDB: {e}");
        exitcode::UNAVAILABLE
    })?;
    info!("Successfully connected to MongoDB");

    // Build application state and router
    let state = AppState::new(Arc::new(store), config.clone());
    let app = build_router(state.clone());

    // Start server
    let addr: SocketAddr = config.server_addr().parse().map_err(|e| {
        error!("Invalid server address: {e}");
        exitcode::CONFIG
    })?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {addr}: {e}");
        exitcode::UNAVAILABLE
    })?;

    info!("Server listening on http://{addr}");
    info!("API endpoints:");
    info!("  GET    /health        - Health check");
    info!("  GET    /ready         - Readiness check");
    info!("  GET    /clients       - List clients");
    info!("  POST   /clients       - Create client");
    info!("  GET    /clients/{{id}}  - Get client");
    info!("  PUT    /clients/{{id}}  - Update client");
    info!("  DELETE /clients/{{id}}  - Delete client");

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {e}");
            exitcode::SOFTWARE
        })?;

    // Gracefully shutdown background tasks
    info!("HTTP server stopped, shutting down background tasks...");
    state.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}
