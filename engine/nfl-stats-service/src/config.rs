//! Service configuration management
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `NFL_STATS_*` environment variables (`__` between nested keys, e.g.
//! `NFL_STATS_SERVER__PORT=9000`), then command line overrides.

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use nflverse_fetcher::FetcherConfig;
use serde::{Deserialize, Serialize};
use stats_engine::{CacheConfig, SeasonBounds};
use stats_gateway::ServerConfig;
use std::path::{Path, PathBuf};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "NFL_STATS";

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "nfl-stats.toml";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Upstream dataset locations and HTTP client settings
    pub fetcher: FetcherConfig,

    /// Cache tier capacities
    pub cache: CacheConfig,

    /// Accepted season range
    pub seasons: SeasonBounds,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Values given on the command line; they win over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// Environment source for `NFL_STATS_*` variables
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.cors_origins")
        .with_list_parse_key("fetcher.default_years")
}

/// Load configuration from defaults, file and environment, then apply
/// command line overrides and validate
pub fn load_config(overrides: &Overrides) -> Result<ServiceConfig> {
    let mut config = load_from_sources(overrides.config_path.as_deref(), environment())?;
    overrides.apply(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn load_from_sources(path: Option<&Path>, env: Environment) -> Result<ServiceConfig> {
    let file = match path {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            File::from(path).required(true)
        }
        None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let defaults = Config::try_from(&ServiceConfig::default()).context("Failed to encode default configuration")?;

    Config::builder()
        .add_source(defaults)
        .add_source(file)
        .add_source(env)
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to parse configuration")
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    // Validate log level
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.logging.level)),
    }

    // Validate log format
    match config.logging.format.as_str() {
        "json" | "pretty" => {}
        _ => return Err(anyhow!("Invalid log format: {}", config.logging.format)),
    }

    if config.server.port == 0 {
        return Err(anyhow!("Invalid server port: {}", config.server.port));
    }
    config.server.socket_addr()?;

    for origin in &config.server.cors_origins {
        if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(anyhow!("Invalid CORS origin: {}", origin));
        }
    }

    let seasons = &config.seasons;
    if seasons.min_year > seasons.max_year {
        return Err(anyhow!(
            "Invalid season range: min_year {} is after max_year {}",
            seasons.min_year,
            seasons.max_year
        ));
    }
    if seasons.default_year < seasons.min_year || seasons.default_year > seasons.max_year {
        return Err(anyhow!(
            "Default season {} is outside {}..={}",
            seasons.default_year,
            seasons.min_year,
            seasons.max_year
        ));
    }

    if config.cache.raw_capacity == 0 || config.cache.enriched_capacity == 0 {
        return Err(anyhow!("Cache capacities must be at least 1"));
    }

    if config.fetcher.timeout_secs == 0 {
        return Err(anyhow!("Fetcher timeout must be at least 1 second"));
    }

    Ok(())
}
