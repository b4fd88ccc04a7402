use crate::columns::{
    PLAYER_COUNT, SUM_KEYS, TD_KEYS, TEAM, TEAM_ABBR, TEAM_COLUMNS, TEAM_LOGO, TEAM_LOGO_ESPN,
    TOTAL_TDS, TOTAL_YARDS, YARD_KEYS,
};
use crate::error::Result;
use nflverse_fetcher::frame::{fill_nulls, has_column, present_columns, select_present, serialize_records};
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TeamAggregates {
    pub year: i32,
    #[serde(serialize_with = "serialize_records")]
    pub data: DataFrame,
}

#[derive(Debug, Serialize)]
pub struct TeamsMeta {
    #[serde(serialize_with = "serialize_records")]
    pub data: DataFrame,
}

/// Sum of the aggregated columns among `keys`, 0 when none are present
fn total(present: &[&str], keys: &[&str]) -> Expr {
    keys.iter()
        .filter(|key| present.contains(*key))
        .map(|key| col(key))
        .reduce(|acc, next| acc + next)
        .unwrap_or_else(|| lit(0.0))
}

/// Team metadata keyed by `team`, with `team_logo_espn` exposed as `team_logo`
fn team_metadata(teams: &DataFrame) -> LazyFrame {
    let mut columns = vec![col(TEAM_ABBR).cast(DataType::String).alias(TEAM)];
    columns.extend(
        present_columns(teams, &TEAM_COLUMNS)
            .into_iter()
            .filter(|name| *name != TEAM_ABBR)
            .map(|name| if name == TEAM_LOGO_ESPN { col(name).alias(TEAM_LOGO) } else { col(name) }),
    );
    teams
        .clone()
        .lazy()
        .select(columns)
        .filter(col(TEAM).is_not_null())
        .unique_stable(Some(vec![TEAM.to_string()]), UniqueKeepStrategy::First)
}

/// Sum the enriched player rows per team and attach team metadata
///
/// Players without a team form their own "" group. Rows come back ordered
/// by team abbreviation with `team_logo_espn` exposed as `team_logo`.
pub fn team_aggregates(
    enriched: &DataFrame,
    teams: &DataFrame,
    year: i32,
    team: Option<&str>,
) -> Result<TeamAggregates> {
    if !has_column(enriched, TEAM) {
        return Ok(TeamAggregates { year, data: DataFrame::empty() });
    }
    let sum_keys = present_columns(enriched, &SUM_KEYS);

    let mut lazy = enriched.clone().lazy();
    if let Some(team) = team {
        lazy = lazy.filter(col(TEAM).cast(DataType::String).eq(lit(team)));
    }

    let mut aggs: Vec<Expr> = sum_keys
        .iter()
        .map(|key| col(key).cast(DataType::Float64).sum().alias(key))
        .collect();
    aggs.push(len().cast(DataType::Int64).alias(PLAYER_COUNT));

    let mut output = vec![col(TEAM)];
    output.extend(sum_keys.iter().map(|key| col(key)));
    output.push(total(&sum_keys, &YARD_KEYS).alias(TOTAL_YARDS));
    output.push(total(&sum_keys, &TD_KEYS).alias(TOTAL_TDS));
    output.push(col(PLAYER_COUNT));

    let mut lazy = lazy
        .group_by([col(TEAM).cast(DataType::String)])
        .agg(aggs)
        .select(output);
    if has_column(teams, TEAM_ABBR) {
        lazy = lazy.join(
            team_metadata(teams),
            [col(TEAM)],
            [col(TEAM)],
            JoinArgs::new(JoinType::Left),
        );
    }

    let data = fill_nulls(lazy.sort_by_exprs([col(TEAM)], SortMultipleOptions::default()).collect()?)?;
    Ok(TeamAggregates { year, data })
}

/// Team metadata projected to the known team columns
pub fn teams_meta(teams: &DataFrame) -> Result<TeamsMeta> {
    let data = fill_nulls(select_present(teams, &TEAM_COLUMNS)?)?;
    Ok(TeamsMeta { data })
}
