use crate::config::FetcherConfig;
use crate::error::{FetchError, Result};
use crate::frame::{concat_frames, read_csv};
use crate::models::DatasetId;
use async_trait::async_trait;
use polars::prelude::DataFrame;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Source of raw, untransformed datasets
///
/// Implementations return the dataset for the requested seasons. Datasets
/// that are not year-partitioned ignore `years`; a year-partitioned dataset
/// requested without years uses the provider's default seasons. Multiple
/// seasons are concatenated in request order.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn fetch(&self, dataset: DatasetId, years: Option<&[i32]>) -> Result<DataFrame>;
}

/// Fetches nflverse CSV release assets over HTTP
pub struct NflverseFetcher {
    config: FetcherConfig,
    client: Client,
}

impl NflverseFetcher {
    /// Create a new fetcher instance
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Download and decode one CSV file
    async fn fetch_csv(&self, url: &str) -> Result<DataFrame> {
        info!("Fetching dataset from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url: url.to_string() });
        }

        let body = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", body.len(), url);

        let frame = read_csv(body.to_vec()).map_err(|e| FetchError::malformed(url, e))?;
        info!("Parsed {} rows with {} columns from {}", frame.height(), frame.width(), url);
        Ok(frame)
    }
}

#[async_trait]
impl DataProvider for NflverseFetcher {
    async fn fetch(&self, dataset: DatasetId, years: Option<&[i32]>) -> Result<DataFrame> {
        if !dataset.supports_years() {
            return self.fetch_csv(&self.config.url_for(dataset, None)).await;
        }

        let years = match years {
            Some(years) if !years.is_empty() => years,
            _ => self.config.default_years.as_slice(),
        };

        let mut frames = Vec::with_capacity(years.len());
        for &year in years {
            frames.push(self.fetch_csv(&self.config.url_for(dataset, Some(year))).await?);
        }
        Ok(concat_frames(frames)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let config = FetcherConfig {
            teams_url: "http://127.0.0.1:9/teams.csv".to_string(),
            timeout_secs: 2,
            ..FetcherConfig::default()
        };
        let fetcher = NflverseFetcher::new(config).unwrap();

        let err = fetcher.fetch(DatasetId::Teams, None).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
