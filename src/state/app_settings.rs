use log::LevelFilter;
use mlb_api::DateRange;

pub const API_URL_ENV: &str = "MLBGRID_API_URL";
pub const LOG_LEVEL_ENV: &str = "MLBGRID_LOG_LEVEL";
const DEFAULT_API_URL: &str = "http://localhost:8080";
/// Schedule warnings are logged at `warn`; the default has to let them through.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_base_url: String,
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_API_URL.to_string(), full_screen: false, log_level: None }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup(API_URL_ENV)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_level = lookup(LOG_LEVEL_ENV).and_then(|level| level.trim().parse().ok());

        Self { api_base_url, full_screen: false, log_level }
    }

    /// The level the logger runs at: the configured one, or `DEFAULT_LOG_LEVEL`.
    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// What the command line asked the first view to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupOptions {
    /// 1-based week number.
    pub week: Option<usize>,
    pub range: Option<DateRange>,
    pub include_odds: bool,
}
