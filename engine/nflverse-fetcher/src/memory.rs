//! In-memory provider for offline runs and tests

use crate::error::{FetchError, Result};
use crate::fetcher::DataProvider;
use crate::frame::concat_frames;
use crate::models::DatasetId;
use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Serves preloaded frames and counts provider calls
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    seasonal: HashMap<(DatasetId, i32), DataFrame>,
    teams: Option<DataFrame>,
    default_years: Vec<i32>,
    fetches: AtomicUsize,
    offline: AtomicBool,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one season of a year-partitioned dataset
    pub fn with_frame(mut self, dataset: DatasetId, year: i32, frame: DataFrame) -> Self {
        self.seasonal.insert((dataset, year), frame);
        if !self.default_years.contains(&year) {
            self.default_years.push(year);
        }
        self
    }

    /// Register the static team frame
    pub fn with_teams(mut self, frame: DataFrame) -> Self {
        self.teams = Some(frame);
        self
    }

    /// Number of `fetch` calls served so far, failed ones included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Simulate the provider becoming unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataProvider for InMemoryProvider {
    async fn fetch(&self, dataset: DatasetId, years: Option<&[i32]>) -> Result<DataFrame> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable(format!("{} provider is offline", dataset)));
        }

        if !dataset.supports_years() {
            return self
                .teams
                .clone()
                .ok_or_else(|| FetchError::Unavailable(format!("no {} frame loaded", dataset)));
        }

        let years = match years {
            Some(years) if !years.is_empty() => years.to_vec(),
            _ => self.default_years.clone(),
        };
        let frames = years
            .iter()
            .map(|year| {
                self.seasonal.get(&(dataset, *year)).cloned().ok_or_else(|| {
                    FetchError::Unavailable(format!("no {} frame for {}", dataset, year))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(concat_frames(frames)?)
    }
}
