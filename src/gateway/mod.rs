//! Access to the smart-meter gateway.
//!
//! The gateway exposes a single JSON document at `/smartmeter/api/read`. This
//! module knows how to locate it, fetch it and decode it into a
//! [`GatewayResponse`] without interpreting any of the values.

pub mod client;
pub mod config;
pub mod response;

// Re-export commonly used items
pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use response::{FieldValue, GatewayResponse};
