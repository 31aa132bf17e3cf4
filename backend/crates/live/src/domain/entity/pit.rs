use crate::domain::value_object::{CarNumber, LapTime};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One pit lane visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitStop {
    pub car: CarNumber,
    pub lap: Option<u32>,
    /// Pit lane time, entry to exit
    pub duration: Option<LapTime>,
    pub at: DateTime<Utc>,
}
