//! # Stats Engine
//!
//! Turns raw nflverse frames into the season views served over HTTP:
//! weekly rows are aggregated per player and season, joined with team
//! metadata, cached per season, and projected into listings, leaderboards,
//! rosters and player comparisons.

pub mod aggregation;
pub mod cache;
pub mod columns;
pub mod enrichment;
pub mod error;
pub mod seasons;
pub mod service;
pub mod views;

pub use aggregation::aggregate_seasonal;
pub use cache::{CacheConfig, CacheStats, RawKey, StatsCache};
pub use enrichment::enrich;
pub use error::{Result, StatsError};
pub use seasons::{SeasonBounds, YearBounds};
pub use service::{DatasetQuery, NflStatsService};
pub use views::*;
