//! Error types for the dataset fetcher

use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for fetcher operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors raised while retrieving a raw dataset from the provider
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed data from {source_name}: {message}")]
    Malformed { source_name: String, message: String },

    #[error("Failed to combine datasets: {0}")]
    Frame(#[from] PolarsError),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    pub fn malformed(source_name: impl Into<String>, message: impl ToString) -> Self {
        FetchError::Malformed { source_name: source_name.into(), message: message.to_string() }
    }
}
