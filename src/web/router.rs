//! Web application router and middleware setup.

use crate::metrics::{ExporterMetrics, StatsSource};
use crate::web::config::WebConfig;
use crate::web::handlers;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// State shared by every handler.
///
/// Both members are created once at startup; neither holds gateway readings.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn StatsSource>,
    pub metrics: Arc<ExporterMetrics>,
}

impl AppState {
    /// Bundle a stats source with the exporter's metrics registry.
    pub fn new(source: Arc<dyn StatsSource>, metrics: Arc<ExporterMetrics>) -> Self {
        Self { source, metrics }
    }
}

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &WebConfig, state: AppState) -> Router {
    let mut app = Router::new()
        .route("/metrics", get(handlers::metrics))
        .route("/healthz", get(handlers::healthz))
        .route("/api/health", get(handlers::health_check))
        .route("/api/stats", get(handlers::get_stats))
        .with_state(state);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
