//! Live Snapshot
//!
//! The aggregate returned to clients on every poll.

use crate::domain::entity::{
    Gap, LapTiming, RaceControlMessage, RadioMessage, SectorTime, Session, TyreState,
    WeatherReport,
};
use crate::domain::value_object::{CarNumber, LapTime};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Upstream feed a snapshot section is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedCategory {
    Session,
    Positions,
    Timing,
    Intervals,
    Tyres,
    PitStops,
    Radio,
    Weather,
    RaceControl,
}

impl FeedCategory {
    pub const ALL: [FeedCategory; 9] = [
        FeedCategory::Session,
        FeedCategory::Positions,
        FeedCategory::Timing,
        FeedCategory::Intervals,
        FeedCategory::Tyres,
        FeedCategory::PitStops,
        FeedCategory::Radio,
        FeedCategory::Weather,
        FeedCategory::RaceControl,
    ];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        use FeedCategory::*;
        match self {
            Session => "session",
            Positions => "positions",
            Timing => "timing",
            Intervals => "intervals",
            Tyres => "tyres",
            PitStops => "pit_stops",
            Radio => "radio",
            Weather => "weather",
            RaceControl => "race_control",
        }
    }
}

impl fmt::Display for FeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    /// All sections current
    Live,
    /// Synthetic session, no live event running
    Demo,
    /// Some sections are stale or missing, see `degraded`
    Degraded,
}

/// One row of the timing tower
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLive {
    pub car: CarNumber,
    pub code: String,
    pub name: String,
    pub team: String,
    pub team_colour: String,
    pub position: u8,
    pub gap_to_leader: Option<Gap>,
    pub interval: Option<Gap>,
    pub lap_number: Option<u32>,
    pub last_lap: Option<LapTime>,
    pub best_lap: Option<LapTime>,
    pub sectors: [Option<SectorTime>; 3],
    pub is_personal_best: bool,
    pub is_session_best: bool,
    pub tyre: Option<TyreState>,
    pub pit_stops: u32,
    pub last_pit_duration: Option<LapTime>,
}

impl DriverLive {
    pub(crate) fn apply_timing(&mut self, timing: &LapTiming) {
        self.lap_number = Some(timing.lap_number);
        self.last_lap = timing.last_lap;
        self.best_lap = timing.best_lap;
        self.sectors = timing.sectors;
        self.is_personal_best = timing.is_personal_best;
        self.is_session_best = timing.is_session_best;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub session: Session,
    pub mode: SnapshotMode,
    /// Sections served from stale data or left empty
    pub degraded: Vec<FeedCategory>,
    pub drivers: Vec<DriverLive>,
    pub weather: Option<WeatherReport>,
    pub race_control: Vec<RaceControlMessage>,
    pub radio: Vec<RadioMessage>,
    pub generated_at: DateTime<Utc>,
}

impl LiveSnapshot {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}
