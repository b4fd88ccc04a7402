//! Component wiring for the NFL stats service

use anyhow::{Context, Result};
use nflverse_fetcher::NflverseFetcher;
use stats_engine::{NflStatsService, StatsCache};
use stats_gateway::StatsGateway;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;

/// Shared state of the running service
pub struct ServiceState {
    pub config: ServiceConfig,
    pub stats: Arc<NflStatsService>,
}

impl ServiceState {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let fetcher = NflverseFetcher::new(config.fetcher.clone()).context("Failed to build HTTP client")?;
        let cache = Arc::new(StatsCache::new(config.cache.clone()));
        let stats = Arc::new(NflStatsService::new(Arc::new(fetcher), cache, config.seasons));

        info!(
            "Stats service ready (seasons {}..={}, default {}, cache {}/{})",
            config.seasons.min_year,
            config.seasons.max_year,
            config.seasons.default_year,
            config.cache.raw_capacity,
            config.cache.enriched_capacity
        );
        Ok(Self { config, stats })
    }

    /// Serve HTTP until `shutdown` resolves
    pub async fn run_gateway<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        StatsGateway::new(self.config.server.clone(), self.stats.clone())
            .run(shutdown)
            .await
            .context("StatsGateway failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_uses_configured_seasons() {
        let mut config = ServiceConfig::default();
        config.seasons.default_year = 2023;
        let state = ServiceState::new(config).unwrap();
        assert_eq!(state.stats.seasons().default_year, 2023);
        assert_eq!(state.stats.cache().stats().raw_capacity, 32);
    }

    #[test]
    fn test_gateway_stops_on_shutdown() {
        let mut config = ServiceConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        let state = ServiceState::new(config).unwrap();
        tokio_test::block_on(state.run_gateway(async {})).unwrap();
    }
}
