//! Web server configuration.

use crate::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Configuration for the exporter's HTTP listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Address to listen on
    pub host: String,
    /// Port Prometheus scrapes
    pub port: u16,
    /// Whether to send permissive CORS headers on the `/api` views
    pub enable_cors: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: crate::DEFAULT_WEB_PORT,
            enable_cors: true,
        }
    }
}

impl WebConfig {
    /// Listener on `host:port` with CORS enabled.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enable_cors: bool) -> Self {
        self.enable_cors = enable_cors;
        self
    }

    /// `host:port` as given, for logging.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the listen address.
    ///
    /// The host must be an IP literal; bracketed IPv6 (`[::]`) and bare IPv6
    /// (`::`) are both accepted.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        host.parse::<std::net::IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.port))
            .map_err(|e| {
                ExporterError::config_error(format!(
                    "Invalid bind address '{}': {}",
                    self.bind_address(),
                    e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listens_on_all_interfaces() {
        let config = WebConfig::default();
        assert_eq!(
            config.socket_addr().unwrap(),
            SocketAddr::from(([0, 0, 0, 0], crate::DEFAULT_WEB_PORT))
        );
        assert!(config.enable_cors);
    }

    #[test]
    fn test_ipv6_hosts() {
        let expected: SocketAddr = "[::1]:9100".parse().unwrap();
        assert_eq!(WebConfig::new("::1", 9100).socket_addr().unwrap(), expected);
        assert_eq!(WebConfig::new("[::1]", 9100).socket_addr().unwrap(), expected);
    }

    #[test]
    fn test_hostname_is_configuration_error() {
        let err = WebConfig::new("localhost", 9000).socket_addr().unwrap_err();
        assert!(matches!(err, ExporterError::Configuration(_)));
        assert!(err.to_string().contains("localhost:9000"));
    }

    #[test]
    fn test_cors_toggle() {
        assert!(!WebConfig::new("127.0.0.1", 9000).with_cors(false).enable_cors);
    }
}
