use crate::domain::value_object::CarNumber;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Running order entry for one car
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPosition {
    pub car: CarNumber,
    pub position: u8,
    /// Upstream timestamp of this record
    pub at: DateTime<Utc>,
}
