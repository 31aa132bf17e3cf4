//! Timing Entities
//!
//! Raw per-lap records as normalized from the feed, and the per-driver
//! summary derived from them.

use crate::domain::value_object::{CarNumber, LapTime};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// One completed (or in-progress) lap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapRecord {
    pub car: CarNumber,
    pub lap_number: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub lap_time: Option<LapTime>,
    pub sectors: [Option<LapTime>; 3],
    pub is_pit_out_lap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorStatus {
    /// Fastest by anyone this session
    SessionBest,
    /// Fastest by this driver this session
    PersonalBest,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorTime {
    pub time: LapTime,
    pub status: SectorStatus,
}

/// Timing summary for one driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapTiming {
    pub car: CarNumber,
    pub lap_number: u32,
    pub last_lap: Option<LapTime>,
    pub sectors: [Option<SectorTime>; 3],
    pub best_lap: Option<LapTime>,
    pub is_personal_best: bool,
    pub is_session_best: bool,
}

/// Time behind another car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Gap {
    Time(LapTime),
    Laps(u32),
}

impl Gap {
    /// Upstream sends a number of seconds or a string such as `"+1 LAP"`.
    pub fn from_upstream(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().and_then(LapTime::from_secs_f64).map(Gap::Time),
            serde_json::Value::String(s) => {
                let trimmed = s.trim().trim_start_matches('+');
                let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
                if trimmed.to_ascii_uppercase().contains("LAP") {
                    digits.parse().ok().map(Gap::Laps)
                } else {
                    trimmed.parse::<f64>().ok().and_then(LapTime::from_secs_f64).map(Gap::Time)
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gap::Time(t) => write!(f, "+{:.3}", t.as_secs_f64()),
            Gap::Laps(1) => write!(f, "+1 LAP"),
            Gap::Laps(n) => write!(f, "+{} LAPS", n),
        }
    }
}

/// Gap to the leader and to the car ahead, as last reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalRecord {
    pub car: CarNumber,
    pub gap_to_leader: Option<Gap>,
    pub interval: Option<Gap>,
    pub at: DateTime<Utc>,
}
