use crate::columns::{PLAYER_ID, POSITION, TEAM, TEAM_CONF};
use crate::error::Result;
use nflverse_fetcher::frame::{distinct_text, has_column, page, serialize_records, sort_desc};
use polars::prelude::*;
use serde::Serialize;

pub const DEFAULT_PLAYER_LIMIT: usize = 500;

/// Filters, sort and page for the player listing
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerQuery {
    pub sort_by: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub conference: Option<String>,
    pub player_id: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for PlayerQuery {
    fn default() -> Self {
        Self {
            sort_by: None,
            position: None,
            team: None,
            conference: None,
            player_id: None,
            limit: DEFAULT_PLAYER_LIMIT,
            offset: 0,
        }
    }
}

impl PlayerQuery {
    /// Equality filters that are set, paired with their column
    fn filters(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (POSITION, &self.position),
            (TEAM, &self.team),
            (TEAM_CONF, &self.conference),
            (PLAYER_ID, &self.player_id),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value.as_deref().filter(|v| !v.is_empty()).map(|v| (column, v))
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PlayerPage {
    pub year: i32,
    #[serde(serialize_with = "serialize_records")]
    pub data: DataFrame,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub available_positions: Vec<String>,
    pub available_teams: Vec<String>,
}

/// Conjunction of the set filters; a filter on a missing column matches nothing
fn filter_expr(enriched: &DataFrame, query: &PlayerQuery) -> Option<Expr> {
    query
        .filters()
        .map(|(column, value)| {
            if has_column(enriched, column) {
                col(column).cast(DataType::String).eq(lit(value))
            } else {
                lit(false)
            }
        })
        .reduce(Expr::and)
}

/// Filter, sort and page the enriched frame
///
/// The available position and team lists describe the whole season, not
/// the filtered rows, so the frontend can keep offering every choice.
pub fn list_players(enriched: &DataFrame, year: i32, query: &PlayerQuery) -> Result<PlayerPage> {
    let available_positions = distinct_text(enriched, POSITION)?;
    let available_teams = distinct_text(enriched, TEAM)?;

    let mut lazy = enriched.clone().lazy();
    if let Some(filter) = filter_expr(enriched, query) {
        lazy = lazy.filter(filter);
    }
    if let Some(sort_by) = query.sort_by.as_deref().filter(|c| has_column(enriched, c)) {
        lazy = sort_desc(lazy, col(sort_by));
    }
    let filtered = lazy.collect()?;

    Ok(PlayerPage {
        year,
        data: page(&filtered, query.offset, query.limit),
        total: filtered.height(),
        offset: query.offset,
        limit: query.limit,
        available_positions,
        available_teams,
    })
}
