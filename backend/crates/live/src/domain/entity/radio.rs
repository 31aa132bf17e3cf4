use crate::domain::value_object::CarNumber;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Team radio clip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioMessage {
    pub car: CarNumber,
    pub at: DateTime<Utc>,
    pub recording_url: String,
}
