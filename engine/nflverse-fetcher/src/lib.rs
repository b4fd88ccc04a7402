//! nflverse Fetcher
//!
//! Retrieves raw NFL datasets (weekly player stats, rosters, team metadata)
//! from the nflverse release assets and decodes them into polars frames.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod frame;
pub mod memory;
pub mod models;

pub use config::FetcherConfig;
pub use error::FetchError;
pub use fetcher::{DataProvider, NflverseFetcher};
pub use frame::{Record, Records};
pub use memory::InMemoryProvider;
pub use models::{DatasetId, DatasetInfo, UnknownDataset};
