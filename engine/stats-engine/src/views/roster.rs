use crate::columns::{OTHER_POSITION, PLAYER_NAME, POSITION, POSITION_ORDER, TEAM};
use crate::error::{Result, StatsError};
use nflverse_fetcher::frame::{has_column, numbers, serialize_records, sort_desc};
use super::text_or_blank;
use polars::prelude::*;
use serde::Serialize;

/// Number of players in the roster chart
pub const CHART_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct PositionGroup {
    pub position: String,
    #[serde(serialize_with = "serialize_records")]
    pub players: DataFrame,
}

#[derive(Debug, Serialize)]
pub struct TeamRoster {
    pub year: i32,
    pub team: String,
    pub sort_by: String,
    pub chart: Vec<ChartPoint>,
    pub groups: Vec<PositionGroup>,
}

fn position_rank(position: &str) -> usize {
    POSITION_ORDER
        .iter()
        .position(|p| *p == position)
        .unwrap_or(POSITION_ORDER.len())
}

/// One team's players ranked by `sort_by`, charted and grouped by position
///
/// Missing stat values rank as 0. Groups follow the fixed position order,
/// then any other positions alphabetically with "Other" sorted by its label.
pub fn team_roster(enriched: &DataFrame, year: i32, team: &str, sort_by: &str) -> Result<TeamRoster> {
    let on_team = if has_column(enriched, TEAM) {
        col(TEAM).cast(DataType::String).eq(lit(team))
    } else {
        lit(false)
    };
    let mut lazy = enriched.clone().lazy().filter(on_team);
    if has_column(enriched, sort_by) {
        lazy = sort_desc(lazy, col(sort_by).cast(DataType::Float64).fill_null(lit(0.0)));
    }
    let roster = lazy.collect()?;
    if roster.height() == 0 {
        return Err(StatsError::not_found(format!("No players found for team '{}' in {}", team, year)));
    }

    let values: Vec<f64> = if has_column(&roster, sort_by) {
        numbers(&roster, sort_by)?.into_iter().map(|v| v.unwrap_or(0.0)).collect()
    } else {
        vec![0.0; roster.height()]
    };
    let chart = text_or_blank(&roster, PLAYER_NAME)?
        .into_iter()
        .zip(values)
        .take(CHART_SIZE)
        .map(|(name, value)| ChartPoint { name, value })
        .collect();

    let labels: Vec<String> = text_or_blank(&roster, POSITION)?
        .into_iter()
        .map(|position| if position.is_empty() { OTHER_POSITION.to_string() } else { position })
        .collect();
    let mut positions = labels.clone();
    positions.sort_by(|a, b| (position_rank(a), a).cmp(&(position_rank(b), b)));
    positions.dedup();

    let groups = positions
        .into_iter()
        .map(|position| {
            let mask: BooleanChunked = labels.iter().map(|label| *label == position).collect();
            Ok(PositionGroup { players: roster.filter(&mask)?, position })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TeamRoster {
        year,
        team: team.to_string(),
        sort_by: sort_by.to_string(),
        chart,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nflverse_fetcher::frame::value;
    use serde_json::json;

    fn enriched() -> DataFrame {
        df!(
            "player_id" => &["1", "2", "3", "4", "5", "6", "7", "8"],
            "player_name" => &["Long Snapper", "Wideout", "Passer", "Mystery", "Runner", "Slot", "Elsewhere", "Kick Returner"],
            "position" => &["LS", "WR", "QB", "", "RB", "WR", "QB", "KR"],
            "team" => &["KC", "KC", "KC", "KC", "KC", "KC", "BUF", "KC"],
            "fantasy_points" => &[0.0, 150.0, 300.0, 5.0, 180.0, 160.0, 400.0, 1.0]
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_team_is_not_found() {
        let err = team_roster(&enriched(), 2024, "ZZZ", "fantasy_points").unwrap_err();
        assert!(matches!(err, StatsError::NotFound(_)));
    }

    #[test]
    fn test_chart_ranks_team_players() {
        let roster = team_roster(&enriched(), 2024, "KC", "fantasy_points").unwrap();
        let names: Vec<&str> = roster.chart.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Passer", "Runner", "Slot", "Wideout", "Mystery", "Kick Returner", "Long Snapper"]
        );
        assert_eq!(roster.chart[0].value, 300.0);
    }

    #[test]
    fn test_groups_follow_position_order() {
        let roster = team_roster(&enriched(), 2024, "KC", "fantasy_points").unwrap();
        let positions: Vec<&str> = roster.groups.iter().map(|g| g.position.as_str()).collect();
        assert_eq!(positions, vec!["QB", "RB", "WR", "KR", "LS", "Other"]);
        let receivers = &roster.groups[2].players;
        assert_eq!(value(receivers, "player_name", 0), json!("Slot"));
        assert_eq!(receivers.height(), 2);
    }

    #[test]
    fn test_unlisted_positions_order_by_label_not_rank() {
        let enriched = df!(
            "player_name" => &["Snapper", "Blank", "Returner"],
            "position" => &["LS", "", "KR"],
            "team" => &["KC", "KC", "KC"],
            "fantasy_points" => &[9.0, 8.0, 7.0]
        )
        .unwrap();

        let roster = team_roster(&enriched, 2024, "KC", "fantasy_points").unwrap();
        let positions: Vec<&str> = roster.groups.iter().map(|g| g.position.as_str()).collect();
        assert_eq!(positions, vec!["KR", "LS", "Other"]);
    }

    #[test]
    fn test_missing_sort_stat_counts_as_zero() {
        let roster = team_roster(&enriched(), 2024, "KC", "receptions").unwrap();
        assert!(roster.chart.iter().all(|p| p.value == 0.0));
        assert_eq!(roster.chart[0].name, "Long Snapper");
    }
}
