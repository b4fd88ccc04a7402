//! # Stats Service
//!
//! Owns the data provider and the cache, resolves seasons, and hands cached
//! frames to the view builders. Every HTTP handler goes through here.

use crate::aggregation::aggregate_seasonal;
use crate::cache::{RawKey, StatsCache};
use crate::enrichment::enrich;
use crate::error::{Result, StatsError};
use crate::seasons::{SeasonBounds, YearBounds};
use crate::views::{
    datasets, leaderboards, player_detail, players, roster, teams, DatasetCatalog, DatasetPage,
    DatasetSchema, Leaderboards, PlayerDetail, PlayerPage, PlayerPeers, PlayerQuery, TeamAggregates,
    TeamRoster, TeamsMeta,
};
use chrono::Utc;
use nflverse_fetcher::{DataProvider, DatasetId};
use polars::prelude::DataFrame;
use std::sync::Arc;
use tracing::{error, info};

/// Page request for the raw dataset browser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetQuery {
    pub years: Option<Vec<i32>>,
    pub columns: Option<Vec<String>>,
    pub offset: usize,
    pub limit: usize,
}

pub struct NflStatsService {
    provider: Arc<dyn DataProvider>,
    cache: Arc<StatsCache>,
    seasons: SeasonBounds,
}

impl NflStatsService {
    pub fn new(provider: Arc<dyn DataProvider>, cache: Arc<StatsCache>, seasons: SeasonBounds) -> Self {
        Self { provider, cache, seasons }
    }

    pub fn seasons(&self) -> &SeasonBounds {
        &self.seasons
    }

    pub fn cache(&self) -> &Arc<StatsCache> {
        &self.cache
    }

    /// Raw dataset through the cache
    pub async fn raw(&self, dataset: DatasetId, years: Option<&[i32]>) -> Result<Arc<DataFrame>> {
        let key = RawKey::new(dataset, years);
        let years = key.years.clone();
        let frame = self
            .cache
            .raw_or_fetch(key, || async {
                let frame = self.provider.fetch(dataset, years.as_deref()).await?;
                info!("Loaded {} rows of {} ({:?})", frame.height(), dataset, years);
                Ok::<_, StatsError>(frame)
            })
            .await;

        if let Err(err) = &frame {
            error!("Failed to load {} dataset: {}", dataset, err);
        }
        frame
    }

    /// Seasonal player rows joined with team metadata for one season
    pub async fn enriched(&self, year: i32) -> Result<Arc<DataFrame>> {
        self.cache
            .enriched_or_build(year, || async {
                let weekly = self.raw(DatasetId::Weekly, Some(&[year])).await?;
                let teams = self.raw(DatasetId::Teams, None).await?;
                let seasonal = aggregate_seasonal(&weekly)?;
                let enriched = enrich(&seasonal, &teams)?;
                info!(
                    "Built enriched frame for {}: {} players, {} columns",
                    year,
                    enriched.height(),
                    enriched.width()
                );
                Ok(enriched)
            })
            .await
    }

    pub async fn players(&self, year: Option<i32>, query: &PlayerQuery) -> Result<PlayerPage> {
        let year = self.seasons.resolve(year)?;
        let enriched = self.enriched(year).await?;
        players::list_players(&enriched, year, query)
    }

    pub async fn leaderboards(&self, year: Option<i32>, per_stat: usize) -> Result<Leaderboards> {
        let year = self.seasons.resolve(year)?;
        let enriched = self.enriched(year).await?;
        leaderboards::leaderboards(&enriched, year, per_stat)
    }

    pub async fn player_detail(
        &self,
        year: Option<i32>,
        player_id: &str,
        stat: &str,
        peer_limit: usize,
    ) -> Result<PlayerDetail> {
        let year = self.seasons.resolve(year)?;
        let enriched = self.enriched(year).await?;
        player_detail::player_detail(&enriched, year, player_id, stat, peer_limit)
    }

    pub async fn player_peers(
        &self,
        year: Option<i32>,
        player_id: &str,
        stat: &str,
        peer_limit: usize,
    ) -> Result<PlayerPeers> {
        let year = self.seasons.resolve(year)?;
        let enriched = self.enriched(year).await?;
        player_detail::player_peers(&enriched, year, player_id, stat, peer_limit)
    }

    pub async fn team_aggregates(&self, year: Option<i32>, team: Option<&str>) -> Result<TeamAggregates> {
        let year = self.seasons.resolve(year)?;
        let enriched = self.enriched(year).await?;
        let teams = self.raw(DatasetId::Teams, None).await?;
        teams::team_aggregates(&enriched, &teams, year, team)
    }

    pub async fn teams_meta(&self) -> Result<TeamsMeta> {
        let teams = self.raw(DatasetId::Teams, None).await?;
        teams::teams_meta(&teams)
    }

    pub async fn team_roster(&self, year: Option<i32>, team: &str, sort_by: &str) -> Result<TeamRoster> {
        let year = self.seasons.resolve(year)?;
        let enriched = self.enriched(year).await?;
        roster::team_roster(&enriched, year, team, sort_by)
    }

    pub fn datasets(&self) -> DatasetCatalog {
        datasets::catalog()
    }

    pub async fn dataset_schema(&self, dataset: DatasetId) -> Result<DatasetSchema> {
        let raw = self.raw(dataset, None).await?;
        Ok(datasets::schema(dataset, &raw))
    }

    pub async fn dataset_data(&self, dataset: DatasetId, query: &DatasetQuery) -> Result<DatasetPage> {
        if let Some(years) = &query.years {
            self.validate_dataset_years(dataset, years)?;
        }
        let raw = self.raw(dataset, query.years.as_deref()).await?;
        datasets::page(dataset, &raw, query.columns.as_deref(), query.offset, query.limit)
    }

    fn validate_dataset_years(&self, dataset: DatasetId, years: &[i32]) -> Result<()> {
        let Some(min_year) = dataset.min_year() else {
            return Ok(());
        };
        match years.iter().find(|y| **y < min_year || **y > self.seasons.max_year) {
            Some(year) => Err(StatsError::validation(format!(
                "{} data is available for {} to {}, got {}",
                dataset, min_year, self.seasons.max_year, year
            ))),
            None => Ok(()),
        }
    }

    pub fn year_bounds(&self) -> YearBounds {
        self.seasons.year_bounds(Utc::now().date_naive())
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nflverse_fetcher::frame::{texts, value};
    use nflverse_fetcher::InMemoryProvider;
    use polars::prelude::*;
    use serde_json::json;

    fn weekly(season: i64) -> DataFrame {
        df!(
            "player_id" => &["qb1", "qb1", "qb2", "rb1"],
            "player_display_name" => &["Arm One", "Arm One", "Arm Two", "Legs"],
            "position" => &["QB", "QB", "QB", "RB"],
            "team" => &["KC", "KC", "BUF", "KC"],
            "season" => &[season; 4],
            "week" => &[1i64, 2, 1, 1],
            "season_type" => &["REG"; 4],
            "passing_yards" => &[300.0, 250.0, 280.0, 0.0],
            "fantasy_points" => &[22.0, 18.0, 25.0, 14.0]
        )
        .unwrap()
    }

    fn teams() -> DataFrame {
        df!(
            "team_abbr" => &["KC", "BUF"],
            "team_name" => &["Kansas City Chiefs", "Buffalo Bills"],
            "team_conf" => &["AFC", "AFC"],
            "team_logo_espn" => &["kc.png", "buf.png"]
        )
        .unwrap()
    }

    fn service() -> (NflStatsService, Arc<InMemoryProvider>) {
        let provider = Arc::new(
            InMemoryProvider::new()
                .with_frame(DatasetId::Weekly, 2024, weekly(2024))
                .with_frame(DatasetId::Weekly, 2023, weekly(2023))
                .with_teams(teams()),
        );
        let service = NflStatsService::new(
            provider.clone(),
            Arc::new(StatsCache::default()),
            SeasonBounds::default(),
        );
        (service, provider)
    }

    #[tokio::test]
    async fn test_enriched_frame_is_cached() {
        let (service, provider) = service();
        let first = service.enriched(2024).await.unwrap();
        let second = service.enriched(2024).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.fetch_count(), 2);
        assert_eq!(first.height(), 3);
        assert_eq!(value(&first, "team_name", 0), json!("Kansas City Chiefs"));
    }

    #[tokio::test]
    async fn test_teams_fetched_once_across_seasons() {
        let (service, provider) = service();
        service.enriched(2024).await.unwrap();
        service.enriched(2023).await.unwrap();
        service.teams_meta().await.unwrap();
        assert_eq!(provider.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_clear_cache_refetches_same_results() {
        let (service, provider) = service();
        let before = service.players(None, &PlayerQuery::default()).await.unwrap();
        service.clear_cache();
        let after = service.players(None, &PlayerQuery::default()).await.unwrap();
        assert_eq!(provider.fetch_count(), 4);
        assert!(before.data.equals_missing(&after.data));
        assert_eq!(before.total, after.total);
    }

    #[tokio::test]
    async fn test_year_out_of_range_skips_fetch() {
        let (service, provider) = service();
        let err = service.players(Some(1990), &PlayerQuery::default()).await.unwrap_err();
        assert!(matches!(err, StatsError::Validation(_)));
        assert_eq!(provider.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_retried() {
        let (service, provider) = service();
        provider.set_offline(true);
        let err = service.leaderboards(None, 5).await.unwrap_err();
        assert!(matches!(err, StatsError::DataSource(_)));

        provider.set_offline(false);
        let boards = service.leaderboards(None, 5).await.unwrap();
        let passing = boards.leaders.get("passing_yards").unwrap();
        assert_eq!(value(passing, "player_id", 0), json!("qb1"));
        assert_eq!(value(passing, "value", 0), json!(550.0));
    }

    #[tokio::test]
    async fn test_pages_concatenate() {
        let (service, _) = service();
        let query = |offset, limit| PlayerQuery {
            sort_by: Some("fantasy_points".into()),
            offset,
            limit,
            ..Default::default()
        };
        let whole = service.players(None, &query(0, 3)).await.unwrap();
        let first = service.players(None, &query(0, 2)).await.unwrap();
        let rest = service.players(None, &query(2, 2)).await.unwrap();
        let ids = |page: &PlayerPage| -> Vec<String> {
            texts(&page.data, "player_id").unwrap().into_iter().flatten().collect()
        };
        let mut joined = ids(&first);
        joined.extend(ids(&rest));
        assert_eq!(joined, ids(&whole));
    }

    #[tokio::test]
    async fn test_team_views() {
        let (service, _) = service();
        let aggregates = service.team_aggregates(None, None).await.unwrap();
        assert_eq!(value(&aggregates.data, "team", 1), json!("KC"));
        assert_eq!(value(&aggregates.data, "team_logo", 1), json!("kc.png"));

        let roster = service.team_roster(None, "KC", "fantasy_points").await.unwrap();
        assert_eq!(roster.groups[0].position, "QB");
        assert!(matches!(
            service.team_roster(None, "NYJ", "fantasy_points").await,
            Err(StatsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_player_detail_and_peers() {
        let (service, _) = service();
        let detail = service.player_detail(None, "qb2", "fantasy_points", 1).await.unwrap();
        assert_eq!(detail.player.get("player_name"), Some(&json!("Arm Two")));
        assert_eq!(detail.peers.len(), 2);
        assert!(detail.peers[1].is_target);

        let peers = service.player_peers(Some(2023), "qb1", "fantasy_points", 10).await.unwrap();
        assert_eq!(peers.year, 2023);
        assert!(peers.peers[0].is_target);
    }

    #[tokio::test]
    async fn test_dataset_browser() {
        let (service, _) = service();
        let schema = service.dataset_schema(DatasetId::Teams).await.unwrap();
        assert_eq!(schema.total_columns, 4);

        let query = DatasetQuery {
            years: Some(vec![2023, 2024]),
            columns: Some(vec!["player_id".into(), "week".into()]),
            offset: 0,
            limit: 100,
        };
        let page = service.dataset_data(DatasetId::Weekly, &query).await.unwrap();
        assert_eq!(page.total_rows, 8);
        assert_eq!(page.columns, vec!["player_id", "week"]);

        let bad = DatasetQuery { years: Some(vec![1980]), limit: 10, ..Default::default() };
        assert!(matches!(
            service.dataset_data(DatasetId::Weekly, &bad).await,
            Err(StatsError::Validation(_))
        ));
    }
}
