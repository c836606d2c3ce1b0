//! HTTP client for the gateway's read endpoint.

use crate::error::{ExporterError, Result};
use crate::gateway::config::GatewayConfig;
use crate::gateway::response::GatewayResponse;
use tracing::{debug, warn};

/// Issues one GET per call against the configured gateway.
///
/// The underlying `reqwest::Client` keeps a connection pool, so a single
/// `GatewayClient` is meant to be created at startup and shared.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    url: String,
}

impl GatewayClient {
    /// Create a client for the given gateway configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        // The gateway sits on the local network, never behind a proxy.
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .no_proxy()
            .build()
            .map_err(|e| ExporterError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.api_url(),
        })
    }

    /// Create a client straight from the `SGPE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&GatewayConfig::from_env()?)
    }

    /// URL the client reads from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the gateway's current reading.
    ///
    /// A non-2xx status aborts before the body is decoded.
    pub async fn fetch(&self) -> Result<GatewayResponse> {
        debug!(url = %self.url, "Requesting gateway reading");

        let response = self.http.get(&self.url).send().await.map_err(|e| {
            warn!(url = %self.url, "Request failed: {}", e);
            ExporterError::transport_error(format!("Request {} failed: {}", self.url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = status.as_u16(), "Gateway returned non-success status");
            // Drain so the pooled connection can be reused; the body is never decoded.
            let _ = response.bytes().await;
            return Err(ExporterError::Gateway {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            ExporterError::transport_error(format!("Failed to read body from {}: {}", self.url, e))
        })?;

        debug!(bytes = body.len(), "Gateway body received");
        GatewayResponse::from_slice(&body)
    }
}
