//! Weather Entities

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One weather station reading. Missing sensors stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    pub at: DateTime<Utc>,
    pub air_temperature: Option<f64>,
    pub track_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub rainfall: bool,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<u16>,
}

/// Latest reading plus the samples it was picked from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub current: WeatherSample,
    pub history: Vec<WeatherSample>,
}

impl WeatherReport {
    /// Samples must be sorted by time; `None` when there are none.
    pub fn from_samples(samples: Vec<WeatherSample>, history_len: usize) -> Option<Self> {
        let current = samples.last()?.clone();
        let skip = samples.len().saturating_sub(history_len);
        Some(Self {
            current,
            history: samples.into_iter().skip(skip).collect(),
        })
    }
}
