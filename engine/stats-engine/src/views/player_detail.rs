use super::text_or_blank;
use crate::columns::{PLAYER_ID, PLAYER_NAME, POSITION, TEAM};
use crate::error::{Result, StatsError};
use nflverse_fetcher::frame::{has_column, numbers, record, sort_desc};
use nflverse_fetcher::Record;
use polars::prelude::*;
use serde::Serialize;

pub const DEFAULT_PEER_LIMIT: usize = 10;

/// One player in a same-position ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peer {
    pub player_id: String,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub value: f64,
    pub is_target: bool,
}

#[derive(Debug, Serialize)]
pub struct PlayerDetail {
    pub year: i32,
    pub stat: String,
    pub player: Record,
    pub peers: Vec<Peer>,
}

#[derive(Debug, Serialize)]
pub struct PlayerPeers {
    pub year: i32,
    pub stat: String,
    pub peers: Vec<Peer>,
}

/// Row index of `player_id` in the enriched frame
fn find_player(enriched: &DataFrame, player_id: &str, year: i32) -> Result<usize> {
    text_or_blank(enriched, PLAYER_ID)?
        .iter()
        .position(|id| id == player_id)
        .ok_or_else(|| StatsError::not_found(format!("Player '{}' not found for {}", player_id, year)))
}

/// Stat as a float with missing values ranked as 0
fn stat_value(df: &DataFrame, stat: &str) -> Expr {
    if has_column(df, stat) {
        col(stat).cast(DataType::Float64).fill_null(lit(0.0))
    } else {
        lit(0.0)
    }
}

/// Every row of `df` as a peer, flagging rows of `target`
fn peers_in(df: &DataFrame, stat: &str, target: &str) -> Result<Vec<Peer>> {
    let values: Vec<f64> = if has_column(df, stat) {
        numbers(df, stat)?.into_iter().map(|v| v.unwrap_or(0.0)).collect()
    } else {
        vec![0.0; df.height()]
    };
    let peers = text_or_blank(df, PLAYER_ID)?
        .into_iter()
        .zip(text_or_blank(df, PLAYER_NAME)?)
        .zip(text_or_blank(df, TEAM)?)
        .zip(text_or_blank(df, POSITION)?)
        .zip(values)
        .map(|((((player_id, player_name), team), position), value)| Peer {
            is_target: player_id == target,
            player_id,
            player_name,
            team,
            position,
            value,
        })
        .collect();
    Ok(peers)
}

/// Top `limit` players sharing the position of the player at `row`, ranked by `stat`
///
/// The subject is flagged `is_target`; when it falls outside the top
/// `limit` it is appended at the end, so it always appears exactly once.
pub fn rank_peers(enriched: &DataFrame, row: usize, stat: &str, limit: usize) -> Result<Vec<Peer>> {
    let target = text_or_blank(enriched, PLAYER_ID)?.swap_remove(row);
    let same_position = if has_column(enriched, POSITION) {
        let position = text_or_blank(enriched, POSITION)?.swap_remove(row);
        col(POSITION).cast(DataType::String).fill_null(lit("")).eq(lit(position))
    } else {
        lit(true)
    };

    let ranked = sort_desc(enriched.clone().lazy().filter(same_position), stat_value(enriched, stat))
        .collect()?;
    let ranked = peers_in(&ranked, stat, &target)?;

    let mut peers: Vec<Peer> = ranked.iter().take(limit).cloned().collect();
    if !peers.iter().any(|peer| peer.is_target) {
        let subject = match ranked.into_iter().find(|peer| peer.is_target) {
            Some(subject) => Some(subject),
            None => peers_in(&enriched.slice(row as i64, 1), stat, &target)?.pop(),
        };
        peers.extend(subject);
    }
    Ok(peers)
}

/// Full row for one player plus their position peer ranking
pub fn player_detail(enriched: &DataFrame, year: i32, player_id: &str, stat: &str, peer_limit: usize) -> Result<PlayerDetail> {
    let row = find_player(enriched, player_id, year)?;
    Ok(PlayerDetail {
        year,
        stat: stat.to_string(),
        player: record(enriched, row),
        peers: rank_peers(enriched, row, stat, peer_limit)?,
    })
}

/// Position peer ranking without the full player row
pub fn player_peers(enriched: &DataFrame, year: i32, player_id: &str, stat: &str, peer_limit: usize) -> Result<PlayerPeers> {
    let row = find_player(enriched, player_id, year)?;
    Ok(PlayerPeers {
        year,
        stat: stat.to_string(),
        peers: rank_peers(enriched, row, stat, peer_limit)?,
    })
}
