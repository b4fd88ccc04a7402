//! Column names and fixed column sets used by the pipeline and views

pub const PLAYER_ID: &str = "player_id";
pub const SEASON: &str = "season";
pub const WEEK: &str = "week";
pub const SEASON_TYPE: &str = "season_type";
pub const PLAYER_NAME: &str = "player_name";
pub const PLAYER_DISPLAY_NAME: &str = "player_display_name";
pub const POSITION: &str = "position";
pub const TEAM: &str = "team";
pub const HEADSHOT_URL: &str = "headshot_url";
pub const GAMES: &str = "games";
pub const TEAM_ABBR: &str = "team_abbr";
pub const TEAM_CONF: &str = "team_conf";
pub const TEAM_LOGO_ESPN: &str = "team_logo_espn";
pub const TEAM_LOGO: &str = "team_logo";
pub const PLAYER_COUNT: &str = "player_count";
pub const TOTAL_YARDS: &str = "total_yards";
pub const TOTAL_TDS: &str = "total_tds";
pub const VALUE: &str = "value";

/// Season-type tag of regular-season weeks
pub const REGULAR_SEASON: &str = "REG";

/// Legacy column spellings and their current names
pub const LEGACY_RENAMES: [(&str, &str); 2] =
    [("recent_team", TEAM), ("interceptions", "passing_interceptions")];

/// Counting stats reduced by sum, with their seasonal names
pub const COUNTING_STATS: [(&str, &str); 14] = [
    ("completions", "completions"),
    ("attempts", "attempts"),
    ("passing_yards", "passing_yards"),
    ("passing_tds", "passing_tds"),
    ("passing_interceptions", "interceptions"),
    ("carries", "carries"),
    ("rushing_yards", "rushing_yards"),
    ("rushing_tds", "rushing_tds"),
    ("receptions", "receptions"),
    ("targets", "targets"),
    ("receiving_yards", "receiving_yards"),
    ("receiving_tds", "receiving_tds"),
    ("fantasy_points", "fantasy_points"),
    ("fantasy_points_ppr", "fantasy_points_ppr"),
];

/// Rate stats reduced by mean, with their seasonal names
pub const RATE_STATS: [(&str, &str); 2] = [("target_share", "target_share"), ("wopr", "wopr_x")];

pub const TARGET_SHARE: &str = "target_share";
/// Alias of the averaged target share kept for the frontend
pub const TARGET_SHARE_ALIAS: &str = "tgt_sh";

/// Team metadata columns carried into the enriched frame
pub const TEAM_COLUMNS: [&str; 8] = [
    TEAM_ABBR,
    "team_name",
    "team_nick",
    TEAM_CONF,
    "team_division",
    "team_color",
    "team_color2",
    TEAM_LOGO_ESPN,
];

/// Stats summed per team by the team aggregate view
pub const SUM_KEYS: [&str; 14] = [
    "completions",
    "attempts",
    "passing_yards",
    "passing_tds",
    "interceptions",
    "carries",
    "rushing_yards",
    "rushing_tds",
    "receptions",
    "targets",
    "receiving_yards",
    "receiving_tds",
    "fantasy_points",
    "fantasy_points_ppr",
];

pub const YARD_KEYS: [&str; 3] = ["passing_yards", "rushing_yards", "receiving_yards"];
pub const TD_KEYS: [&str; 3] = ["passing_tds", "rushing_tds", "receiving_tds"];

/// Stats eligible for top-N leaderboards
pub const LEADERBOARD_STATS: [&str; 9] = [
    "passing_yards",
    "passing_tds",
    "rushing_yards",
    "rushing_tds",
    "receiving_yards",
    "receiving_tds",
    "receptions",
    "fantasy_points",
    "fantasy_points_ppr",
];

/// Columns shown next to each leaderboard value
pub const LEADER_IDENTITY_COLUMNS: [&str; 7] =
    [PLAYER_ID, PLAYER_NAME, POSITION, TEAM, HEADSHOT_URL, "team_name", "team_color"];

/// Roster group order; other positions follow alphabetically
pub const POSITION_ORDER: [&str; 7] = ["QB", "RB", "WR", "TE", "FB", "K", "P"];

/// Group label for players without a position
pub const OTHER_POSITION: &str = "Other";

/// Stat used when a ranking view is not given one
pub const DEFAULT_RANKING_STAT: &str = "fantasy_points";
