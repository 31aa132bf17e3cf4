//! Application Configuration
//!
//! Configuration for live session aggregation.

use crate::domain::entity::FeedCategory;
use platform::config::{env_millis, env_or, env_secs, env_string};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openf1.org/v1";

/// Cache lifetimes per feed category
#[derive(Debug, Clone)]
pub struct FeedTtls {
    pub session: Duration,
    pub positions: Duration,
    pub timing: Duration,
    pub intervals: Duration,
    pub tyres: Duration,
    pub pit_stops: Duration,
    pub radio: Duration,
    pub weather: Duration,
    /// Poll interval for the race-control feed; messages themselves are kept
    /// in the sequence log, not expired
    pub race_control: Duration,
    /// Full position history, only read by the position chart
    pub position_history: Duration,
}

impl Default for FeedTtls {
    fn default() -> Self {
        Self {
            session: Duration::from_secs(30),
            positions: Duration::from_secs(10),
            timing: Duration::from_secs(10),
            intervals: Duration::from_secs(10),
            tyres: Duration::from_secs(10),
            pit_stops: Duration::from_secs(10),
            radio: Duration::from_secs(15),
            weather: Duration::from_secs(300),
            race_control: Duration::from_secs(10),
            position_history: Duration::from_secs(60),
        }
    }
}

impl FeedTtls {
    pub fn get(&self, category: FeedCategory) -> Duration {
        match category {
            FeedCategory::Session => self.session,
            FeedCategory::Positions => self.positions,
            FeedCategory::Timing => self.timing,
            FeedCategory::Intervals => self.intervals,
            FeedCategory::Tyres => self.tyres,
            FeedCategory::PitStops => self.pit_stops,
            FeedCategory::Radio => self.radio,
            FeedCategory::Weather => self.weather,
            FeedCategory::RaceControl => self.race_control,
        }
    }
}

/// Live application configuration
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// Telemetry provider base URL
    pub api_base: String,
    pub ttls: FeedTtls,
    /// How long past its ttl a value is still served without waiting
    pub stale_grace: Duration,
    /// Overall budget for one snapshot request
    pub snapshot_deadline: Duration,
    /// No position update for this long moves a live session to stale
    pub stale_after: Duration,
    /// No position update for this long evicts the session
    pub session_timeout: Duration,
    /// A session counts as live this long after its scheduled end
    pub live_buffer: Duration,
    /// Race-control messages included in a snapshot
    pub race_control_window: usize,
    /// Radio clips included in a snapshot
    pub radio_window: usize,
    /// Weather samples kept as history in a snapshot
    pub weather_history: usize,
    /// Demo race laps advanced per real minute
    pub demo_laps_per_minute: f64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            ttls: FeedTtls::default(),
            stale_grace: Duration::from_secs(20),
            snapshot_deadline: Duration::from_millis(4000),
            stale_after: Duration::from_secs(60),
            session_timeout: Duration::from_secs(900),
            live_buffer: Duration::from_secs(30 * 60),
            race_control_window: 25,
            radio_window: 15,
            weather_history: 30,
            demo_laps_per_minute: 3.0,
        }
    }
}

impl LiveConfig {
    /// Defaults overridden by `LIVE_*` environment variables.
    pub fn from_env() -> Self {
        let d = Self::default();
        let demo_laps_per_minute: f64 = env_or("LIVE_DEMO_LAPS_PER_MINUTE", d.demo_laps_per_minute);
        Self {
            api_base: env_string("LIVE_API_BASE", &d.api_base),
            ttls: FeedTtls {
                positions: env_secs("LIVE_POSITIONS_TTL_SECS", d.ttls.positions),
                timing: env_secs("LIVE_TIMING_TTL_SECS", d.ttls.timing),
                weather: env_secs("LIVE_WEATHER_TTL_SECS", d.ttls.weather),
                ..d.ttls
            },
            stale_grace: env_secs("LIVE_STALE_GRACE_SECS", d.stale_grace),
            snapshot_deadline: env_millis("LIVE_SNAPSHOT_DEADLINE_MS", d.snapshot_deadline),
            stale_after: env_secs("LIVE_STALE_AFTER_SECS", d.stale_after),
            session_timeout: env_secs("LIVE_SESSION_TIMEOUT_SECS", d.session_timeout),
            live_buffer: env_secs("LIVE_SESSION_BUFFER_SECS", d.live_buffer),
            race_control_window: env_or("LIVE_RACE_CONTROL_WINDOW", d.race_control_window),
            radio_window: env_or("LIVE_RADIO_WINDOW", d.radio_window),
            weather_history: d.weather_history,
            demo_laps_per_minute: if demo_laps_per_minute.is_finite() && demo_laps_per_minute > 0.0 {
                demo_laps_per_minute
            } else {
                d.demo_laps_per_minute
            },
        }
    }

    /// Session end buffer as a calendar duration
    pub fn live_buffer(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.live_buffer).unwrap_or(chrono::Duration::minutes(30))
    }
}
