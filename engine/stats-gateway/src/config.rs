//! Configuration for the StatsGateway

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

use crate::error::GatewayError;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_HOST.to_string(),
            port: crate::DEFAULT_PORT,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Socket address the server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, GatewayError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| GatewayError::Config(format!("Invalid host address: {}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
