//! Query parameter parsing and bounds checks
//!
//! Every check runs before the service is touched, so a bad request never
//! triggers a fetch.

use crate::error::ApiRejection;
use stats_engine::columns::DEFAULT_RANKING_STAT;
use stats_engine::views::{DEFAULT_DATASET_LIMIT, DEFAULT_PEER_LIMIT, DEFAULT_PER_STAT, DEFAULT_PLAYER_LIMIT};
use stats_engine::{DatasetQuery, PlayerQuery};
use std::collections::HashMap;
use std::str::FromStr;

pub type QueryParams = HashMap<String, String>;

pub const MAX_PLAYER_LIMIT: usize = 5000;
pub const MAX_RANKING_SIZE: usize = 100;
pub const MAX_DATASET_LIMIT: usize = 10_000;

type ParamResult<T> = Result<T, ApiRejection>;

/// Non-empty string parameter
pub fn text(params: &QueryParams, name: &str) -> Option<String> {
    params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse<T: FromStr>(params: &QueryParams, name: &str, expected: &str) -> ParamResult<Option<T>> {
    match params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ApiRejection::validation(format!("{} must be {}, got '{}'", name, expected, raw))),
    }
}

/// Requested season, if any; range checks belong to the service
pub fn year(params: &QueryParams) -> ParamResult<Option<i32>> {
    parse(params, "year", "an integer")
}

/// Integer parameter within `min..=max`, `default` when absent
pub fn bounded(params: &QueryParams, name: &str, default: usize, min: usize, max: usize) -> ParamResult<usize> {
    let value = parse::<usize>(params, name, "a non-negative integer")?.unwrap_or(default);
    if value < min || value > max {
        return Err(ApiRejection::validation(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}

pub fn offset(params: &QueryParams) -> ParamResult<usize> {
    bounded(params, "offset", 0, 0, usize::MAX)
}

/// Stat used for rankings, defaulting to fantasy points
pub fn ranking_stat(params: &QueryParams, name: &str) -> String {
    text(params, name).unwrap_or_else(|| DEFAULT_RANKING_STAT.to_string())
}

pub fn per_stat(params: &QueryParams) -> ParamResult<usize> {
    bounded(params, "per_stat", DEFAULT_PER_STAT, 1, MAX_RANKING_SIZE)
}

pub fn peer_limit(params: &QueryParams) -> ParamResult<usize> {
    bounded(params, "peer_limit", DEFAULT_PEER_LIMIT, 1, MAX_RANKING_SIZE)
}

pub fn player_query(params: &QueryParams) -> ParamResult<PlayerQuery> {
    Ok(PlayerQuery {
        sort_by: text(params, "sort_by"),
        position: text(params, "position"),
        team: text(params, "team"),
        conference: text(params, "conference"),
        player_id: text(params, "player_id"),
        limit: bounded(params, "limit", DEFAULT_PLAYER_LIMIT, 1, MAX_PLAYER_LIMIT)?,
        offset: offset(params)?,
    })
}

/// Comma-separated list, empty items dropped
fn list(params: &QueryParams, name: &str) -> Option<Vec<String>> {
    let items: Vec<String> = params
        .get(name)?
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

pub fn dataset_query(params: &QueryParams) -> ParamResult<DatasetQuery> {
    let years = match list(params, "years") {
        None => None,
        Some(items) => Some(
            items
                .iter()
                .map(|item| {
                    item.parse::<i32>().map_err(|_| {
                        ApiRejection::validation(format!("years must be comma-separated integers, got '{}'", item))
                    })
                })
                .collect::<ParamResult<Vec<i32>>>()?,
        ),
    };

    Ok(DatasetQuery {
        years,
        columns: list(params, "columns"),
        offset: offset(params)?,
        limit: bounded(params, "limit", DEFAULT_DATASET_LIMIT, 1, MAX_DATASET_LIMIT)?,
    })
}
