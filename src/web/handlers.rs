//! HTTP handlers for the exporter endpoints.

use crate::web::router::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

/// Prometheus scrape endpoint.
///
/// Each request performs one gateway fetch and conversion. A failed reading
/// still answers 200 with `smartmeter_gateway_up 0`.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.scrape(state.source.as_ref()).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, state.metrics.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}

/// Current reading as JSON.
pub async fn get_stats(State(state): State<AppState>) -> Response {
    match state.source.current_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            error!(kind = e.kind(), "Failed to read gateway: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": e.kind(),
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Liveness check.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "smartmeter-exporter",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
