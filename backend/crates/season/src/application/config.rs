//! Application Configuration

use platform::RateLimitConfig;
use platform::config::{env_or, env_secs, env_string};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.jolpi.ca/ergast/f1";

/// Season application configuration
#[derive(Debug, Clone)]
pub struct SeasonConfig {
    /// Historical provider base URL
    pub api_base: String,
    /// Season path segment, a year or `current`
    pub season: String,
    pub schedule_ttl: Duration,
    pub next_race_ttl: Duration,
    pub standings_ttl: Duration,
    /// Classifications of finished rounds, qualifying and driver histories
    pub results_ttl: Duration,
    /// How long past its ttl a value is still served without waiting
    pub stale_grace: Duration,
    /// Provider quota windows; a request needs room in all of them
    pub rate_limits: Vec<RateLimitConfig>,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            season: "current".to_string(),
            schedule_ttl: Duration::from_secs(3600),
            next_race_ttl: Duration::from_secs(30 * 60),
            standings_ttl: Duration::from_secs(15 * 60),
            results_ttl: Duration::from_secs(3600),
            stale_grace: Duration::from_secs(5 * 60),
            rate_limits: vec![RateLimitConfig::new(4, 1), RateLimitConfig::new(200, 3600)],
        }
    }
}

impl SeasonConfig {
    /// Defaults overridden by `SEASON_*` environment variables.
    pub fn from_env() -> Self {
        let d = Self::default();
        let per_hour: u32 = env_or("SEASON_REQUESTS_PER_HOUR", 200);
        Self {
            api_base: env_string("SEASON_API_BASE", &d.api_base),
            season: env_string("SEASON_YEAR", &d.season),
            schedule_ttl: env_secs("SEASON_SCHEDULE_TTL_SECS", d.schedule_ttl),
            next_race_ttl: env_secs("SEASON_NEXT_RACE_TTL_SECS", d.next_race_ttl),
            standings_ttl: env_secs("SEASON_STANDINGS_TTL_SECS", d.standings_ttl),
            results_ttl: env_secs("SEASON_RESULTS_TTL_SECS", d.results_ttl),
            stale_grace: env_secs("SEASON_STALE_GRACE_SECS", d.stale_grace),
            rate_limits: vec![RateLimitConfig::new(4, 1), RateLimitConfig::new(per_hour.max(1), 3600)],
        }
    }
}
