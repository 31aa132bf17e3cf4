//! Race Control Entities

use crate::domain::value_object::CarNumber;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceControlCategory {
    Flag,
    Penalty,
    SafetyCar,
    Other,
}

impl RaceControlCategory {
    /// Category reported by the feed, used when no translation rule applies.
    pub fn from_upstream(hint: Option<&str>) -> Self {
        match hint.map(str::trim) {
            Some("Flag") => RaceControlCategory::Flag,
            Some("SafetyCar") | Some("VirtualSafetyCar") => RaceControlCategory::SafetyCar,
            _ => RaceControlCategory::Other,
        }
    }
}

/// Race control message as received
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRaceControl {
    pub at: DateTime<Utc>,
    pub category_hint: Option<String>,
    pub flag: Option<String>,
    pub scope: Option<String>,
    pub car: Option<CarNumber>,
    pub lap: Option<u32>,
    pub message: String,
}

/// Translated race control message with a per-session sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceControlMessage {
    /// Strictly increasing within one session
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub category: RaceControlCategory,
    pub flag: Option<String>,
    pub car: Option<CarNumber>,
    pub lap: Option<u32>,
    pub raw: String,
    pub normalized: String,
    /// Name of the rule that produced `normalized`; `None` on passthrough
    pub rule: Option<&'static str>,
}
