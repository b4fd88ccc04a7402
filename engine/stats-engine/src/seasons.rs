use crate::error::{Result, StatsError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Month the regular season kicks off
const SEASON_START_MONTH: u32 = 9;

/// Accepted season range and the season used when none is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonBounds {
    pub min_year: i32,
    pub max_year: i32,
    pub default_year: i32,
}

impl Default for SeasonBounds {
    fn default() -> Self {
        Self {
            min_year: 1999,
            max_year: 2026,
            default_year: 2024,
        }
    }
}

/// Season range advertised to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearBounds {
    pub latest: i32,
    pub min: i32,
}

impl SeasonBounds {
    /// Check a requested season, falling back to the default when absent
    pub fn resolve(&self, year: Option<i32>) -> Result<i32> {
        let year = year.unwrap_or(self.default_year);
        if year < self.min_year || year > self.max_year {
            return Err(StatsError::validation(format!(
                "year must be between {} and {}, got {}",
                self.min_year, self.max_year, year
            )));
        }
        Ok(year)
    }

    /// Most recent season that has started by `today`, kept within bounds
    pub fn latest_season(&self, today: NaiveDate) -> i32 {
        let year = if today.month() >= SEASON_START_MONTH { today.year() } else { today.year() - 1 };
        year.clamp(self.min_year, self.max_year)
    }

    pub fn year_bounds(&self, today: NaiveDate) -> YearBounds {
        YearBounds { latest: self.latest_season(today), min: self.min_year }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_defaults_and_bounds() {
        let bounds = SeasonBounds::default();
        assert_eq!(bounds.resolve(None).unwrap(), 2024);
        assert_eq!(bounds.resolve(Some(1999)).unwrap(), 1999);
        assert_eq!(bounds.resolve(Some(2026)).unwrap(), 2026);
        assert!(matches!(bounds.resolve(Some(1998)), Err(StatsError::Validation(_))));
        assert!(matches!(bounds.resolve(Some(2027)), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_latest_season_rolls_over_in_september() {
        let bounds = SeasonBounds::default();
        assert_eq!(bounds.latest_season(date(2025, 8, 31)), 2024);
        assert_eq!(bounds.latest_season(date(2025, 9, 1)), 2025);
        assert_eq!(bounds.latest_season(date(2026, 1, 15)), 2025);
    }

    #[test]
    fn test_latest_season_is_clamped() {
        let bounds = SeasonBounds::default();
        assert_eq!(bounds.latest_season(date(2031, 10, 1)), 2026);
        assert_eq!(bounds.year_bounds(date(2025, 10, 1)), YearBounds { latest: 2025, min: 1999 });
    }
}
