use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw datasets exposed by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetId {
    /// Weekly player stats, one row per player per game week
    Weekly,
    /// Seasonal team rosters
    Rosters,
    /// Static team descriptions (names, divisions, colors, logos)
    Teams,
}

impl DatasetId {
    pub const ALL: [DatasetId; 3] = [DatasetId::Weekly, DatasetId::Rosters, DatasetId::Teams];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetId::Weekly => "weekly",
            DatasetId::Rosters => "rosters",
            DatasetId::Teams => "teams",
        }
    }

    /// Whether the dataset is partitioned by season
    pub fn supports_years(&self) -> bool {
        !matches!(self, DatasetId::Teams)
    }

    /// Earliest season the provider publishes
    pub fn min_year(&self) -> Option<i32> {
        match self {
            DatasetId::Weekly => Some(1999),
            DatasetId::Rosters => Some(1920),
            DatasetId::Teams => None,
        }
    }

    /// Catalog entry for the dataset browser
    pub fn info(&self) -> DatasetInfo {
        let (name, description) = match self {
            DatasetId::Weekly => (
                "Weekly Player Stats",
                "Per-game offensive stats and fantasy points for every player",
            ),
            DatasetId::Rosters => {
                ("Seasonal Rosters", "Roster entries with position, team and headshot per season")
            }
            DatasetId::Teams => {
                ("Team Descriptions", "Team names, conferences, divisions, colors and logos")
            }
        };
        DatasetInfo {
            id: *self,
            name: name.to_string(),
            description: description.to_string(),
            supports_years: self.supports_years(),
            min_year: self.min_year(),
        }
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetId {
    type Err = UnknownDataset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownDataset(s.to_string()))
    }
}

/// Dataset identifier that does not name a known dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDataset(pub String);

impl fmt::Display for UnknownDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset '{}' not found", self.0)
    }
}

impl std::error::Error for UnknownDataset {}

/// Dataset catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub id: DatasetId,
    pub name: String,
    pub description: String,
    pub supports_years: bool,
    pub min_year: Option<i32>,
}
