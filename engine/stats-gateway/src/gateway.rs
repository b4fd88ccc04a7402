//! HTTP server wrapper around the REST routes

use crate::config::ServerConfig;
use crate::error::GatewayError;
use crate::rest_api::create_routes;
use stats_engine::NflStatsService;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// Serves the stats API until the shutdown signal resolves
pub struct StatsGateway {
    config: ServerConfig,
    service: Arc<NflStatsService>,
}

impl StatsGateway {
    pub fn new(config: ServerConfig, service: Arc<NflStatsService>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind and serve; in-flight requests finish before this returns
    pub async fn run<S>(self, shutdown: S) -> Result<(), GatewayError>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr()?;
        let routes = create_routes(self.service.clone(), &self.config.cors_origins);

        let (bound, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))?;

        info!("StatsGateway listening on http://{}", bound);
        server.await;
        info!("StatsGateway stopped");
        Ok(())
    }
}
