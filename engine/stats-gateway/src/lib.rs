//! StatsGateway - REST API for NFL player and team stats
//!
//! Exposes the stats engine's views as JSON endpoints, validates query
//! parameters, and maps engine errors onto HTTP responses.

pub mod config;
pub mod error;
pub mod gateway;
pub mod params;
pub mod rest_api;

pub use config::ServerConfig;
pub use error::{handle_rejection, ErrorDetail, ErrorResponse, GatewayError};
pub use gateway::StatsGateway;
pub use rest_api::create_routes;

/// Service name reported by the root endpoint
pub const SERVICE_NAME: &str = "nfl-data-api";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";
