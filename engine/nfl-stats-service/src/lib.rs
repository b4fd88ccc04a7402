//! NFL Stats Service Library
//!
//! Configuration loading, logging setup, component wiring, and shutdown
//! handling for the `nfl-stats` binary.

use anyhow::{Context, Result};

pub mod config;
pub mod logging;
pub mod service;
pub mod signals;

pub use config::{Overrides, ServiceConfig};
pub use logging::initialize_logging_with_config;
pub use service::ServiceState;
pub use signals::setup_signal_handlers;

/// Load configuration from files, environment variables and CLI overrides
pub fn load_configuration(overrides: &Overrides) -> Result<ServiceConfig> {
    config::load_config(overrides).context("Failed to load service configuration")
}
