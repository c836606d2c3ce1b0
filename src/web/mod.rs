//! Web server exposing the exporter endpoints.
//!
//! `/metrics` serves the Prometheus exposition, `/healthz` a static liveness
//! answer, and `/api/*` JSON views of the same data.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::{create_app, AppState};

use crate::error::{ExporterError, Result};
use tracing::info;

/// Start the web server with the provided configuration and shared state.
pub async fn start_web_server(config: WebConfig, state: AppState) -> Result<()> {
    let app = create_app(&config, state);

    let addr = config.socket_addr()?;

    info!("Starting smart-meter exporter on http://{}", addr);
    info!("Metrics endpoint: http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ExporterError::web_server_error(format!("Server error: {}", e)))?;

    info!("Exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
