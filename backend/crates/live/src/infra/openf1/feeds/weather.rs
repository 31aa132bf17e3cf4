use super::timestamp;
use crate::domain::entity::WeatherSample;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeather {
    pub date: Option<String>,
    pub air_temperature: Option<f64>,
    pub track_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    /// 0/1 upstream, occasionally a boolean
    #[serde(default)]
    pub rainfall: serde_json::Value,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
}

fn is_raining(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v > 0.0),
        _ => false,
    }
}

/// Samples in time order, one per timestamp.
pub fn normalize(raw: Vec<RawWeather>) -> Vec<WeatherSample> {
    let mut samples: Vec<WeatherSample> = raw
        .into_iter()
        .filter_map(|r| {
            Some(WeatherSample {
                at: timestamp(&r.date)?,
                air_temperature: r.air_temperature,
                track_temperature: r.track_temperature,
                humidity: r.humidity,
                pressure: r.pressure,
                rainfall: is_raining(&r.rainfall),
                wind_speed: r.wind_speed,
                wind_direction: r
                    .wind_direction
                    .filter(|d| (0.0..=360.0).contains(d))
                    .map(|d| d.round() as u16),
            })
        })
        .collect();
    samples.sort_by_key(|s| s.at);
    samples.dedup_by_key(|s| s.at);
    samples
}
