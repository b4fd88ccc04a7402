//! Joins team metadata onto seasonal player rows

use crate::columns::{PLAYER_NAME, TEAM, TEAM_ABBR, TEAM_COLUMNS};
use crate::error::Result;
use nflverse_fetcher::frame::{fill_nulls, has_column, present_columns};
use polars::prelude::*;
use tracing::debug;

/// Temporary join key shared by both sides
const JOIN_KEY: &str = "__team_key";

/// Team metadata keyed by abbreviation, first row per team
fn team_side(teams: &DataFrame, joined: &[&str]) -> LazyFrame {
    let mut columns = vec![col(TEAM_ABBR).cast(DataType::String).alias(JOIN_KEY)];
    columns.extend(joined.iter().map(|name| col(name)));
    teams
        .clone()
        .lazy()
        .select(columns)
        .filter(col(JOIN_KEY).is_not_null())
        .unique_stable(Some(vec![JOIN_KEY.to_string()]), UniqueKeepStrategy::First)
}

/// Left-join team metadata onto seasonal rows
///
/// Rows without a player name are dropped and remaining nulls are filled
/// (0 in number columns, "" elsewhere). Teams missing from the metadata
/// leave the joined columns empty.
pub fn enrich(seasonal: &DataFrame, teams: &DataFrame) -> Result<DataFrame> {
    let joined: Vec<&str> = if has_column(teams, TEAM_ABBR) {
        present_columns(teams, &TEAM_COLUMNS)
            .into_iter()
            .filter(|name| !has_column(seasonal, name))
            .collect()
    } else {
        Vec::new()
    };

    let mut output: Vec<Expr> = seasonal.get_columns().iter().map(|s| col(s.name())).collect();
    output.extend(joined.iter().map(|name| col(name)));

    let mut lazy = seasonal.clone().lazy();
    if !joined.is_empty() {
        let key = if has_column(seasonal, TEAM) {
            col(TEAM).cast(DataType::String)
        } else {
            lit(NULL).cast(DataType::String)
        };
        lazy = lazy.with_column(key.alias(JOIN_KEY)).join(
            team_side(teams, &joined),
            [col(JOIN_KEY)],
            [col(JOIN_KEY)],
            JoinArgs::new(JoinType::Left),
        );
    }

    let named = if has_column(seasonal, PLAYER_NAME) {
        col(PLAYER_NAME)
            .is_not_null()
            .and(col(PLAYER_NAME).cast(DataType::String).neq(lit("")))
    } else {
        lit(false)
    };

    let enriched = fill_nulls(lazy.select(output).filter(named).collect()?)?;
    debug!(
        "Enriched {} of {} seasonal rows with {} team columns",
        enriched.height(),
        seasonal.height(),
        joined.len()
    );
    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nflverse_fetcher::frame::{texts, value};
    use serde_json::json;

    fn seasonal() -> DataFrame {
        df!(
            "player_id" => &["p1", "p2", "p3"],
            "player_name" => &[Some("Arm Strong"), Some("Free Agent"), None],
            "team" => &["KC", "XXX", "KC"],
            "passing_yards" => &[4000.0, 10.0, 5.0],
            "target_share" => &[None, Some(0.1), None]
        )
        .unwrap()
    }

    fn teams() -> DataFrame {
        df!(
            "team_abbr" => &["KC", "KC"],
            "team_name" => &["Kansas City Chiefs", "Duplicate"],
            "team_conf" => &["AFC", "AFC"],
            "team_color" => &["#E31837", "#000000"],
            "team_wordmark" => &["w.png", "x.png"]
        )
        .unwrap()
    }

    #[test]
    fn test_joins_team_columns() {
        let enriched = enrich(&seasonal(), &teams()).unwrap();
        let names: Vec<String> = enriched.get_columns().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["player_id", "player_name", "team", "passing_yards", "target_share", "team_abbr", "team_name", "team_conf", "team_color"]
        );
        assert_eq!(value(&enriched, "team_name", 0), json!("Kansas City Chiefs"));
    }

    #[test]
    fn test_drops_rows_without_name() {
        let enriched = enrich(&seasonal(), &teams()).unwrap();
        assert_eq!(enriched.height(), 2);
        let ids = texts(&enriched, "player_id").unwrap();
        assert!(!ids.contains(&Some("p3".to_string())));
    }

    #[test]
    fn test_unmatched_team_is_filled() {
        let enriched = enrich(&seasonal(), &teams()).unwrap();
        assert_eq!(value(&enriched, "team_name", 1), json!(""));
        assert_eq!(value(&enriched, "target_share", 0), json!(0.0));
    }

    #[test]
    fn test_duplicate_team_rows_keep_first() {
        let enriched = enrich(&seasonal(), &teams()).unwrap();
        let ids = texts(&enriched, "player_id").unwrap();
        assert_eq!(ids.iter().filter(|id| id.as_deref() == Some("p1")).count(), 1);
        assert_eq!(value(&enriched, "team_color", 0), json!("#E31837"));
    }

    #[test]
    fn test_teams_without_abbreviation_join_nothing() {
        let teams = df!("team_name" => &["Kansas City Chiefs"]).unwrap();
        let enriched = enrich(&seasonal(), &teams).unwrap();
        assert_eq!(enriched.width(), 5);
        assert_eq!(enriched.height(), 2);
    }
}
