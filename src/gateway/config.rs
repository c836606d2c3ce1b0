//! Gateway connection configuration.

use crate::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the gateway host (optionally `host:port`).
pub const HOST_ENV: &str = "SGPE_HOST";

/// Environment variable holding an explicit gateway port.
pub const PORT_ENV: &str = "SGPE_PORT";

/// Environment variable overriding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "SGPE_TIMEOUT_SECS";

/// Path of the gateway's JSON status endpoint.
pub const API_PATH: &str = "/smartmeter/api/read";

/// Default upper bound for a single gateway request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the smart-meter gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway host or `host:port`
    pub host: String,
    /// Explicit port, appended to the host when set
    pub port: Option<u16>,
    /// Request timeout
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Create a configuration for the given host with default settings.
    ///
    /// Fails with a configuration error when the host is blank.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ExporterError::config_error(format!("{} not set", HOST_ENV)));
        }

        Ok(Self {
            host,
            port: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV)
            .ok_or_else(|| ExporterError::config_error(format!("{} not set", HOST_ENV)))?;
        let mut config = Self::new(host)?;

        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.is_empty()) {
            let port = port.parse::<u16>().map_err(|e| {
                ExporterError::config_error(format!("Invalid {} '{}': {}", PORT_ENV, port, e))
            })?;
            config = config.with_port(Some(port));
        }

        if let Some(secs) = lookup(TIMEOUT_ENV).filter(|s| !s.is_empty()) {
            let secs = secs.parse::<u64>().map_err(|e| {
                ExporterError::config_error(format!("Invalid {} '{}': {}", TIMEOUT_ENV, secs, e))
            })?;
            if secs == 0 {
                return Err(ExporterError::config_error(format!(
                    "{} must be greater than zero",
                    TIMEOUT_ENV
                )));
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set an explicit gateway port.
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the gateway's read endpoint.
    pub fn api_url(&self) -> String {
        match self.port {
            Some(port) => format!("http://{}:{}{}", self.host, port, API_PATH),
            None => format!("http://{}{}", self.host, API_PATH),
        }
    }
}
