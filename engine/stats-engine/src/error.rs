//! Error types for the stats engine

use nflverse_fetcher::FetchError;
use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors surfaced by the stats service
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Data source error: {0}")]
    DataSource(#[from] FetchError),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Frame operation failed: {0}")]
    Frame(#[from] PolarsError),
}

impl StatsError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
