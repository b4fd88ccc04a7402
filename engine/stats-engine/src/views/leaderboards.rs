use crate::columns::{LEADERBOARD_STATS, LEADER_IDENTITY_COLUMNS, VALUE};
use crate::error::Result;
use nflverse_fetcher::frame::{has_column, present_columns, sort_desc};
use nflverse_fetcher::Records;
use polars::prelude::*;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const DEFAULT_PER_STAT: usize = 10;

/// Leaderboards keyed by stat, in leaderboard order
#[derive(Debug, Default)]
pub struct LeaderMap(Vec<(String, DataFrame)>);

impl LeaderMap {
    pub fn get(&self, stat: &str) -> Option<&DataFrame> {
        self.0.iter().find(|(name, _)| name == stat).map(|(_, board)| board)
    }

    pub fn stats(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for LeaderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (stat, board) in &self.0 {
            map.serialize_entry(stat, &Records(board))?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct Leaderboards {
    pub year: i32,
    pub per_stat: usize,
    pub leaders: LeaderMap,
}

/// Top `per_stat` players for every leaderboard stat
pub fn leaderboards(enriched: &DataFrame, year: i32, per_stat: usize) -> Result<Leaderboards> {
    let identity = present_columns(enriched, &LEADER_IDENTITY_COLUMNS);
    let leaders = LEADERBOARD_STATS
        .iter()
        .map(|stat| Ok((stat.to_string(), leaderboard(enriched, &identity, stat, per_stat)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Leaderboards { year, per_stat, leaders: LeaderMap(leaders) })
}

/// One leaderboard: identity columns plus the stat as `value`
///
/// A stat the frame lacks yields an empty leaderboard.
fn leaderboard(enriched: &DataFrame, identity: &[&str], stat: &str, limit: usize) -> Result<DataFrame> {
    if !has_column(enriched, stat) {
        return Ok(DataFrame::empty());
    }
    let mut columns: Vec<Expr> = identity.iter().map(|name| col(name)).collect();
    columns.push(col(stat).alias(VALUE));

    let board = sort_desc(enriched.clone().lazy(), col(stat))
        .limit(limit as IdxSize)
        .select(columns)
        .collect()?;
    Ok(board)
}
