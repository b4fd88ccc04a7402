//! REST API endpoints for the StatsGateway
//!
//! Every endpoint answers GET with JSON except the cache reset, which is a
//! POST. Handlers parse their query parameters up front and hand the rest to
//! the stats service.

use crate::error::{handle_rejection, ApiRejection};
use crate::params::{self, QueryParams};
use crate::SERVICE_NAME;
use nflverse_fetcher::DatasetId;
use stats_engine::NflStatsService;
use std::sync::Arc;
use tracing::info;
use warp::{Filter, Rejection, Reply};

fn dataset_id(raw: &str) -> Result<DatasetId, ApiRejection> {
    raw.parse::<DatasetId>().map_err(|err| {
        ApiRejection::not_found(err.to_string()).with_details(serde_json::json!({ "dataset_id": raw }))
    })
}

/// Service banner
pub async fn get_root() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME
    })))
}

/// Earliest and most recent season
pub async fn get_years(service: Arc<NflStatsService>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&service.year_bounds()))
}

/// Filtered, sorted, paginated player listing
pub async fn get_players(params: QueryParams, service: Arc<NflStatsService>) -> Result<impl Reply, Rejection> {
    let year = params::year(&params)?;
    let query = params::player_query(&params)?;
    let page = service.players(year, &query).await.map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&page))
}

pub async fn get_leaderboards(params: QueryParams, service: Arc<NflStatsService>) -> Result<impl Reply, Rejection> {
    let year = params::year(&params)?;
    let per_stat = params::per_stat(&params)?;
    let boards = service.leaderboards(year, per_stat).await.map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&boards))
}

/// One player's full row plus same-position peers
pub async fn get_player_detail(
    player_id: String,
    params: QueryParams,
    service: Arc<NflStatsService>,
) -> Result<impl Reply, Rejection> {
    let year = params::year(&params)?;
    let stat = params::ranking_stat(&params, "stat");
    let peer_limit = params::peer_limit(&params)?;
    let detail = service
        .player_detail(year, &player_id, &stat, peer_limit)
        .await
        .map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&detail))
}

pub async fn get_player_peers(
    player_id: String,
    params: QueryParams,
    service: Arc<NflStatsService>,
) -> Result<impl Reply, Rejection> {
    let year = params::year(&params)?;
    let stat = params::ranking_stat(&params, "stat");
    let peer_limit = params::peer_limit(&params)?;
    let peers = service
        .player_peers(year, &player_id, &stat, peer_limit)
        .await
        .map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&peers))
}

/// Per-team sums with team metadata
pub async fn get_teams(params: QueryParams, service: Arc<NflStatsService>) -> Result<impl Reply, Rejection> {
    let year = params::year(&params)?;
    let team = params::text(&params, "team");
    let aggregates = service
        .team_aggregates(year, team.as_deref())
        .await
        .map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&aggregates))
}

pub async fn get_teams_meta(service: Arc<NflStatsService>) -> Result<impl Reply, Rejection> {
    let meta = service.teams_meta().await.map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&meta))
}

pub async fn get_team_roster(
    team: String,
    params: QueryParams,
    service: Arc<NflStatsService>,
) -> Result<impl Reply, Rejection> {
    let year = params::year(&params)?;
    let sort_by = params::ranking_stat(&params, "sort_by");
    let roster = service
        .team_roster(year, &team, &sort_by)
        .await
        .map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&roster))
}

pub async fn get_datasets(service: Arc<NflStatsService>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&service.datasets()))
}

pub async fn get_dataset_schema(dataset: String, service: Arc<NflStatsService>) -> Result<impl Reply, Rejection> {
    let dataset = dataset_id(&dataset)?;
    let schema = service.dataset_schema(dataset).await.map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&schema))
}

pub async fn get_dataset_data(
    dataset: String,
    params: QueryParams,
    service: Arc<NflStatsService>,
) -> Result<impl Reply, Rejection> {
    let dataset = dataset_id(&dataset)?;
    let query = params::dataset_query(&params)?;
    let page = service.dataset_data(dataset, &query).await.map_err(ApiRejection::from)?;
    Ok(warp::reply::json(&page))
}

pub async fn clear_cache(service: Arc<NflStatsService>) -> Result<impl Reply, Rejection> {
    service.clear_cache();
    info!("Cache cleared via API");
    Ok(warp::reply::json(&serde_json::json!({ "status": "cache cleared" })))
}

/// Create REST API routes
pub fn create_routes(
    service: Arc<NflStatsService>,
    cors_origins: &[String],
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let service_filter = warp::any().map(move || service.clone());
    let query = warp::query::<QueryParams>();

    let root = warp::path::end().and(warp::get()).and_then(get_root);

    // Health check endpoint
    let health = warp::path("health").and(warp::path::end()).and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    });

    let years = warp::path("years")
        .and(warp::path::end())
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_years);

    let players = warp::path("players")
        .and(warp::path::end())
        .and(warp::get())
        .and(query.clone())
        .and(service_filter.clone())
        .and_then(get_players);

    let player_detail = warp::path("players")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(query.clone())
        .and(service_filter.clone())
        .and_then(get_player_detail);

    let player_peers = warp::path("players")
        .and(warp::path::param::<String>())
        .and(warp::path("peers"))
        .and(warp::path::end())
        .and(warp::get())
        .and(query.clone())
        .and(service_filter.clone())
        .and_then(get_player_peers);

    let leaderboards = warp::path("leaderboards")
        .and(warp::path::end())
        .and(warp::get())
        .and(query.clone())
        .and(service_filter.clone())
        .and_then(get_leaderboards);

    let teams = warp::path("teams")
        .and(warp::path::end())
        .and(warp::get())
        .and(query.clone())
        .and(service_filter.clone())
        .and_then(get_teams);

    let teams_meta = warp::path("teams")
        .and(warp::path("meta"))
        .and(warp::path::end())
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_teams_meta);

    let team_roster = warp::path("teams")
        .and(warp::path::param::<String>())
        .and(warp::path("roster"))
        .and(warp::path::end())
        .and(warp::get())
        .and(query.clone())
        .and(service_filter.clone())
        .and_then(get_team_roster);

    let datasets = warp::path("datasets")
        .and(warp::path::end())
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_datasets);

    let dataset_schema = warp::path("datasets")
        .and(warp::path::param::<String>())
        .and(warp::path("schema"))
        .and(warp::path::end())
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_dataset_schema);

    let dataset_data = warp::path("datasets")
        .and(warp::path::param::<String>())
        .and(warp::path("data"))
        .and(warp::path::end())
        .and(warp::get())
        .and(query.clone())
        .and(service_filter.clone())
        .and_then(get_dataset_data);

    let cache_clear = warp::path("cache")
        .and(warp::path("clear"))
        .and(warp::path::end())
        .and(warp::post())
        .and(service_filter)
        .and_then(clear_cache);

    let cors = if cors_origins.iter().any(|origin| origin == "*") {
        warp::cors().allow_any_origin()
    } else {
        warp::cors().allow_origins(cors_origins.iter().map(String::as_str))
    };

    // Combine all routes
    root.or(health)
        .or(years)
        .or(players)
        .or(player_peers)
        .or(player_detail)
        .or(leaderboards)
        .or(teams_meta)
        .or(team_roster)
        .or(teams)
        .or(datasets)
        .or(dataset_schema)
        .or(dataset_data)
        .or(cache_clear)
        .recover(handle_rejection)
        .with(
            cors.allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "OPTIONS"]),
        )
}
