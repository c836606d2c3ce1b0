//! Gateway reading conversion and Prometheus exposition.
//!
//! This module turns a raw [`GatewayResponse`](crate::gateway::GatewayResponse)
//! into typed [`Stats`] and renders those as gauges and counters in the
//! Prometheus text format.

pub mod data;
pub mod mapper;
pub mod registry;
pub mod traits;

// Re-export commonly used items
pub use data::Stats;
pub use mapper::StatsMapper;
pub use registry::ExporterMetrics;
pub use traits::{GatewayStatsSource, StatsSource};
