//! Fetch one raw dataset and print a short summary

use clap::Parser;
use nflverse_fetcher::frame::record;
use nflverse_fetcher::{DataProvider, DatasetId, FetcherConfig, NflverseFetcher};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "fetch-dataset")]
#[command(about = "Fetch one nflverse dataset and log its shape")]
struct Args {
    /// Dataset id: weekly, rosters or teams
    #[arg(default_value = "weekly")]
    dataset: DatasetId,

    /// Seasons to fetch; the configured defaults when omitted
    years: Vec<i32>,

    /// Rows to print
    #[arg(long, default_value_t = 3)]
    rows: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let fetcher = NflverseFetcher::new(FetcherConfig::default())?;
    info!("Fetching {} for years {:?}", args.dataset, args.years);

    let years = (!args.years.is_empty()).then_some(args.years.as_slice());
    match fetcher.fetch(args.dataset, years).await {
        Ok(frame) => {
            info!("Fetched {} rows x {} columns", frame.height(), frame.width());
            for series in frame.get_columns() {
                info!("  {} ({})", series.name(), series.dtype());
            }
            for row in 0..frame.height().min(args.rows) {
                info!("  {}", serde_json::to_string(&record(&frame, row))?);
            }
        }
        Err(e) => {
            error!("Failed to fetch {}: {}", args.dataset, e);
            return Err(e.into());
        }
    }

    Ok(())
}
