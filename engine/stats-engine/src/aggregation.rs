//! # Seasonal Aggregation
//!
//! Reduces weekly player rows into one row per (player, season). Counting
//! stats are summed, rate stats averaged, identity fields take the latest
//! week's value, and `games` counts the contributing weeks.

use crate::columns::*;
use crate::error::Result;
use nflverse_fetcher::frame::has_column;
use polars::prelude::*;
use tracing::{debug, warn};

/// Name of `name` in the weekly frame, falling back to its legacy spelling
fn source_column<'a>(weekly: &DataFrame, name: &'a str) -> Option<&'a str> {
    if has_column(weekly, name) {
        return Some(name);
    }
    LEGACY_RENAMES
        .iter()
        .find(|(_, current)| *current == name)
        .map(|(legacy, _)| *legacy)
        .filter(|legacy| has_column(weekly, legacy))
}

/// Last non-null value of the group, groups being in week order
fn latest(name: &str) -> Expr {
    col(name).drop_nulls().last()
}

/// Rows that count towards a season: regular season, with a player id and season
fn contributing_rows(weekly: &DataFrame) -> Expr {
    let mut keep = col(PLAYER_ID)
        .is_not_null()
        .and(col(PLAYER_ID).neq(lit("")));
    if has_column(weekly, SEASON_TYPE) {
        keep = keep.and(col(SEASON_TYPE).cast(DataType::String).eq(lit(REGULAR_SEASON)));
    }
    if has_column(weekly, SEASON) {
        keep = keep.and(col(SEASON).is_not_null());
    }
    keep
}

/// Output aggregations, in output column order after the group keys
fn aggregations(weekly: &DataFrame) -> Vec<Expr> {
    let mut aggs = Vec::new();

    let display = has_column(weekly, PLAYER_DISPLAY_NAME);
    let short = has_column(weekly, PLAYER_NAME);
    match (display, short) {
        (true, true) => {
            let display_name = latest(PLAYER_DISPLAY_NAME).cast(DataType::String);
            aggs.push(
                when(display_name.clone().is_not_null().and(display_name.clone().neq(lit(""))))
                    .then(display_name)
                    .otherwise(latest(PLAYER_NAME).cast(DataType::String))
                    .alias(PLAYER_NAME),
            );
        }
        (true, false) => aggs.push(latest(PLAYER_DISPLAY_NAME).alias(PLAYER_NAME)),
        (false, true) => aggs.push(latest(PLAYER_NAME).alias(PLAYER_NAME)),
        (false, false) => {}
    }

    for name in [POSITION, TEAM, HEADSHOT_URL] {
        if let Some(source) = source_column(weekly, name) {
            aggs.push(latest(source).alias(name));
        }
    }

    for (source, output) in COUNTING_STATS {
        if let Some(source) = source_column(weekly, source) {
            aggs.push(col(source).cast(DataType::Float64).sum().alias(output));
        }
    }

    for (source, output) in RATE_STATS {
        if let Some(source) = source_column(weekly, source) {
            aggs.push(col(source).cast(DataType::Float64).mean().alias(output));
        }
    }
    if has_column(weekly, TARGET_SHARE) {
        aggs.push(col(TARGET_SHARE).cast(DataType::Float64).mean().alias(TARGET_SHARE_ALIAS));
    }

    aggs.push(len().cast(DataType::Int64).alias(GAMES));
    aggs
}

/// Aggregate weekly stat rows into seasonal player rows
///
/// Only regular-season weeks with a player id contribute. Stat columns the
/// weekly frame lacks are left out of the result instead of failing.
pub fn aggregate_seasonal(weekly: &DataFrame) -> Result<DataFrame> {
    if !has_column(weekly, PLAYER_ID) {
        warn!("Weekly frame has no {} column; nothing to aggregate", PLAYER_ID);
        return Ok(DataFrame::empty());
    }

    let mut keys = vec![col(PLAYER_ID)];
    let mut normalized = vec![col(PLAYER_ID).cast(DataType::String)];
    if has_column(weekly, SEASON) {
        keys.push(col(SEASON));
        normalized.push(col(SEASON).cast(DataType::Int64));
    }

    let mut lazy = weekly.clone().lazy().with_columns(normalized).filter(contributing_rows(weekly));
    if has_column(weekly, WEEK) {
        lazy = lazy.sort_by_exprs(
            [col(WEEK)],
            SortMultipleOptions::default().with_maintain_order(true),
        );
    }

    let seasonal = lazy
        .group_by_stable(keys.clone())
        .agg(aggregations(weekly))
        .sort_by_exprs(keys, SortMultipleOptions::default().with_maintain_order(true))
        .collect()?;

    debug!(
        "Aggregated {} weekly rows into {} seasonal rows",
        weekly.height(),
        seasonal.height()
    );
    Ok(seasonal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nflverse_fetcher::frame::{texts, value};
    use serde_json::{json, Value};

    fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_columns().iter().map(|s| s.name().to_string()).collect()
    }

    fn sample() -> DataFrame {
        df!(
            "player_id" => &["p1", "p1", "p1", "p1", "p2", "", "p3"],
            "player_name" => &["short"; 7],
            "player_display_name" => &["Sam Mover", "Sam Mover", "Sam Mover", "Sam Mover", "Solo Back", "Ghost", "Playoff Only"],
            "position" => &["WR", "WR", "TE", "WR", "RB", "QB", "QB"],
            "team" => &["NYJ", "KC", "DEN", "KC", "BUF", "BUF", "BUF"],
            "season" => &[2024i64; 7],
            "week" => &[1i64, 4, 2, 19, 3, 1, 20],
            "season_type" => &["REG", "REG", "REG", "POST", "REG", "REG", "POST"],
            "passing_yards" => &[50.0, 70.0, 30.0, 999.0, 0.0, 300.0, 250.0],
            "passing_interceptions" => &[1.0; 7],
            "target_share" => &[Some(0.2), None, Some(0.4), Some(0.9), None, None, None],
            "wopr" => &[0.5; 7]
        )
        .unwrap()
    }

    #[test]
    fn test_one_row_per_player_season() {
        let seasonal = aggregate_seasonal(&sample()).unwrap();
        let ids = texts(&seasonal, "player_id").unwrap();
        assert_eq!(ids, vec![Some("p1".to_string()), Some("p2".to_string())]);
    }

    #[test]
    fn test_games_counts_regular_season_weeks() {
        let seasonal = aggregate_seasonal(&sample()).unwrap();
        assert_eq!(value(&seasonal, "games", 0), json!(3));
        assert_eq!(value(&seasonal, "games", 1), json!(1));
    }

    #[test]
    fn test_counting_stats_sum_and_rename() {
        let seasonal = aggregate_seasonal(&sample()).unwrap();
        assert_eq!(value(&seasonal, "passing_yards", 0), json!(150.0));
        assert_eq!(value(&seasonal, "interceptions", 0), json!(3.0));
        assert!(!has_column(&seasonal, "passing_interceptions"));
    }

    #[test]
    fn test_rate_stats_average_present_weeks() {
        let seasonal = aggregate_seasonal(&sample()).unwrap();
        let share = value(&seasonal, "target_share", 0).as_f64().unwrap();
        assert!((share - 0.3).abs() < 1e-9);
        assert_eq!(value(&seasonal, "tgt_sh", 0), value(&seasonal, "target_share", 0));
        assert_eq!(value(&seasonal, "wopr_x", 0), json!(0.5));
        assert!(!has_column(&seasonal, "wopr"));
        assert_eq!(value(&seasonal, "target_share", 1), Value::Null);
    }

    #[test]
    fn test_identity_comes_from_latest_week() {
        let seasonal = aggregate_seasonal(&sample()).unwrap();
        assert_eq!(value(&seasonal, "team", 0), json!("KC"));
        assert_eq!(value(&seasonal, "position", 0), json!("WR"));
        assert_eq!(value(&seasonal, "player_name", 0), json!("Sam Mover"));
    }

    #[test]
    fn test_null_identity_in_latest_week_falls_back_to_earlier_week() {
        let weekly = df!(
            "player_id" => &["p1", "p1", "p1"],
            "season" => &[2024i64; 3],
            "week" => &[4i64, 3, 1],
            "team" => &[None, Some("MIA"), Some("NYJ")],
            "receptions" => &[5.0, 6.0, 7.0]
        )
        .unwrap();

        let seasonal = aggregate_seasonal(&weekly).unwrap();
        assert_eq!(value(&seasonal, "team", 0), json!("MIA"));
        assert_eq!(value(&seasonal, "games", 0), json!(3));
    }

    #[test]
    fn test_seasons_are_aggregated_separately() {
        let weekly = df!(
            "player_id" => &["p1", "p1", "p1", "p2"],
            "season" => &[2023i64, 2024, 2024, 2023],
            "week" => &[1i64, 1, 2, 5],
            "rushing_yards" => &[10.0, 20.0, 30.0, 40.0]
        )
        .unwrap();

        let seasonal = aggregate_seasonal(&weekly).unwrap();
        assert_eq!(seasonal.height(), 3);

        let keys: Vec<(Value, Value, Value)> = (0..seasonal.height())
            .map(|row| {
                (
                    value(&seasonal, "player_id", row),
                    value(&seasonal, "season", row),
                    value(&seasonal, "games", row),
                )
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                (json!("p1"), json!(2023), json!(1)),
                (json!("p1"), json!(2024), json!(2)),
                (json!("p2"), json!(2023), json!(1)),
            ]
        );
        assert_eq!(value(&seasonal, "rushing_yards", 1), json!(50.0));
    }

    #[test]
    fn test_missing_stat_columns_are_omitted() {
        let weekly = df!(
            "player_id" => &["p9", "p9"],
            "season" => &[2005i64, 2005],
            "week" => &[1i64, 2],
            "recent_team" => &["STL", "STL"],
            "rushing_yards" => &[80.0, 20.0]
        )
        .unwrap();

        let seasonal = aggregate_seasonal(&weekly).unwrap();
        assert_eq!(
            column_names(&seasonal),
            vec!["player_id", "season", "team", "rushing_yards", "games"]
        );
        assert_eq!(value(&seasonal, "rushing_yards", 0), json!(100.0));
        assert_eq!(value(&seasonal, "games", 0), json!(2));
    }

    #[test]
    fn test_output_column_order() {
        let seasonal = aggregate_seasonal(&sample()).unwrap();
        assert_eq!(
            column_names(&seasonal),
            vec![
                "player_id",
                "season",
                "player_name",
                "position",
                "team",
                "passing_yards",
                "interceptions",
                "target_share",
                "wopr_x",
                "tgt_sh",
                "games"
            ]
        );
    }

    #[test]
    fn test_without_player_id_column_is_empty() {
        let weekly = df!("season" => &[2024i64]).unwrap();
        assert_eq!(aggregate_seasonal(&weekly).unwrap().height(), 0);
    }
}
