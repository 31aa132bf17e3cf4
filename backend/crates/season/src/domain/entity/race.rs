//! Race Weekend Entities

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendSession {
    FirstPractice,
    SecondPractice,
    ThirdPractice,
    SprintQualifying,
    Sprint,
    Qualifying,
    Race,
}

/// Scheduled session of a race weekend. Older seasons only publish dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSlot {
    pub kind: WeekendSession,
    pub date: NaiveDate,
    pub starts_at: Option<DateTime<Utc>>,
}

/// One round of the championship
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub round: u32,
    pub name: String,
    pub circuit: String,
    pub circuit_id: String,
    pub country: String,
    pub locality: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub date: NaiveDate,
    /// Race start; the published time or 14:00 UTC when none is given
    pub starts_at: DateTime<Utc>,
    /// Weekend sessions in running order, race last
    pub sessions: Vec<SessionSlot>,
    pub is_past: bool,
    pub is_next: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub season: String,
    pub races: Vec<Race>,
}
