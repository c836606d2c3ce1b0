//! # Smart-meter exporter
//!
//! Re-exposes the readings of a local smart-meter gateway as Prometheus
//! metrics. Every scrape of `/metrics` issues one request to the gateway's
//! `/smartmeter/api/read` endpoint, converts the JSON fields into typed
//! values and renders them as gauges and counters. Nothing is cached between
//! scrapes.
//!
//! ## Features
//!
//! - **Tolerant decoding**: gateway fields may arrive as strings or native JSON values
//! - **Strict conversion**: a malformed field fails the scrape, never a partial reading
//! - **Failure isolation**: a failed scrape reports `smartmeter_gateway_up 0` and the process keeps serving
//! - **Library + Binary**: use as a crate or standalone exporter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smartmeter_exporter::{
//!     start_web_server, AppState, ExporterMetrics, GatewayClient, GatewayStatsSource, WebConfig,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::from_env()?;
//!     let state = AppState::new(
//!         Arc::new(GatewayStatsSource::new(client)),
//!         Arc::new(ExporterMetrics::new()?),
//!     );
//!
//!     start_web_server(WebConfig::default(), state).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gateway;
pub mod metrics;
pub mod web;

// Re-export public API
pub use error::{ExporterError, Result};
pub use gateway::{FieldValue, GatewayClient, GatewayConfig, GatewayResponse};
pub use metrics::{
    data::{Firmware, Gas, Power, Stats},
    ExporterMetrics, GatewayStatsSource, StatsMapper, StatsSource,
};
pub use web::{start_web_server, AppState, WebConfig};

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 9000;
