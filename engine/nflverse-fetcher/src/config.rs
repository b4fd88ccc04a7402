use crate::models::DatasetId;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the season in URL templates
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Configuration for the nflverse fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Weekly player stats CSV, one file per season
    pub weekly_url: String,

    /// Seasonal roster CSV, one file per season
    pub rosters_url: String,

    /// Team descriptions CSV (single static file)
    pub teams_url: String,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Seasons fetched when a year-partitioned dataset is requested without years
    pub default_years: Vec<i32>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            weekly_url: "https://github.com/nflverse/nflverse-data/releases/download/stats_player/stats_player_week_{year}.csv".to_string(),
            rosters_url: "https://github.com/nflverse/nflverse-data/releases/download/rosters/roster_{year}.csv".to_string(),
            teams_url: "https://github.com/nflverse/nflverse-pbp/raw/master/teams_colors_logos.csv".to_string(),
            timeout_secs: 30,
            user_agent: format!("nfl-stats/{}", env!("CARGO_PKG_VERSION")),
            default_years: vec![2024],
        }
    }
}

impl FetcherConfig {
    /// Template for a dataset's download URL
    pub fn url_template(&self, dataset: DatasetId) -> &str {
        match dataset {
            DatasetId::Weekly => &self.weekly_url,
            DatasetId::Rosters => &self.rosters_url,
            DatasetId::Teams => &self.teams_url,
        }
    }

    /// Concrete URL for a dataset and season
    pub fn url_for(&self, dataset: DatasetId, year: Option<i32>) -> String {
        let template = self.url_template(dataset);
        match year {
            Some(year) => template.replace(YEAR_PLACEHOLDER, &year.to_string()),
            None => template.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_substitutes_year() {
        let config = FetcherConfig::default();
        let url = config.url_for(DatasetId::Weekly, Some(2023));
        assert!(url.ends_with("stats_player_week_2023.csv"));
        assert_eq!(config.url_for(DatasetId::Teams, None), config.teams_url);
    }

    #[test]
    fn test_default_years() {
        assert_eq!(FetcherConfig::default().default_years, vec![2024]);
    }
}
