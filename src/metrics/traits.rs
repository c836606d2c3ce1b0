//! Traits for obtaining converted gateway readings.

use crate::error::Result;
use crate::gateway::GatewayClient;
use crate::metrics::data::Stats;
use crate::metrics::mapper::StatsMapper;
use async_trait::async_trait;

/// Source of a fresh [`Stats`] value per call.
///
/// Implementations must not cache: every call reflects the gateway's state at
/// the time of the call.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch and convert the current reading.
    async fn current_stats(&self) -> Result<Stats>;
}

/// The production source: one gateway request followed by one conversion.
#[derive(Debug, Clone)]
pub struct GatewayStatsSource {
    client: GatewayClient,
    mapper: StatsMapper,
}

impl GatewayStatsSource {
    /// Wrap a gateway client.
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            mapper: StatsMapper::new(),
        }
    }

    /// The underlying gateway client.
    pub fn client(&self) -> &GatewayClient {
        &self.client
    }
}

#[async_trait]
impl StatsSource for GatewayStatsSource {
    async fn current_stats(&self) -> Result<Stats> {
        let resp = self.client.fetch().await?;
        self.mapper.convert(&resp)
    }
}
