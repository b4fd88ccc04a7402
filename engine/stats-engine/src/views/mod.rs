//! Response shapes computed from the cached frames

pub mod datasets;
pub mod leaderboards;
pub mod player_detail;
pub mod players;
pub mod roster;
pub mod teams;

pub use datasets::{ColumnInfo, DatasetCatalog, DatasetPage, DatasetSchema, DEFAULT_DATASET_LIMIT};
pub use leaderboards::{LeaderMap, Leaderboards, DEFAULT_PER_STAT};
pub use player_detail::{Peer, PlayerDetail, PlayerPeers, DEFAULT_PEER_LIMIT};
pub use players::{PlayerPage, PlayerQuery, DEFAULT_PLAYER_LIMIT};
pub use roster::{ChartPoint, PositionGroup, TeamRoster, CHART_SIZE};
pub use teams::{TeamAggregates, TeamsMeta};

use crate::error::Result;
use nflverse_fetcher::frame::{has_column, texts};
use polars::prelude::DataFrame;

/// Text column with missing cells as "", or all "" when the column is absent
pub(crate) fn text_or_blank(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    if !has_column(df, name) {
        return Ok(vec![String::new(); df.height()]);
    }
    Ok(texts(df, name)?.into_iter().map(Option::unwrap_or_default).collect())
}
