//! NFL Stats API Service
//!
//! Entry point for the HTTP service. Loads configuration, sets up logging,
//! wires the fetcher, cache and stats engine, and serves until Ctrl+C or
//! SIGTERM.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use nfl_stats_service::{
    initialize_logging_with_config, load_configuration, setup_signal_handlers, Overrides, ServiceState,
};

#[derive(Parser, Debug)]
#[command(name = "nfl-stats", version, about = "NFL player and team stats API")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let overrides = Overrides {
        config_path: cli.config,
        host: cli.host,
        port: cli.port,
        log_level: cli.log_level,
    };
    let config = load_configuration(&overrides)?;

    initialize_logging_with_config(&config.logging.level, &config.logging.format)?;
    info!("Starting NFL Stats Service v{}", env!("CARGO_PKG_VERSION"));

    let state = ServiceState::new(config)?;

    let shutdown_signal = setup_signal_handlers()?;
    state
        .run_gateway(async move {
            let _ = shutdown_signal.await;
            info!("Shutdown signal received. Draining in-flight requests...");
        })
        .await?;

    info!("NFL Stats Service shutdown complete");
    Ok(())
}
