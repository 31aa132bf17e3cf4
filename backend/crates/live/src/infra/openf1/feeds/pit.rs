use super::{car, timestamp};
use crate::domain::entity::PitStop;
use crate::domain::value_object::LapTime;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawPit {
    pub driver_number: Option<u32>,
    pub lap_number: Option<u32>,
    pub pit_duration: Option<f64>,
    pub date: Option<String>,
}

/// Pit stops in time order, repeats removed.
pub fn normalize(raw: Vec<RawPit>) -> Vec<PitStop> {
    let mut stops: Vec<PitStop> = raw
        .into_iter()
        .filter_map(|r| {
            Some(PitStop {
                car: car(r.driver_number)?,
                lap: r.lap_number,
                duration: r.pit_duration.and_then(LapTime::from_secs_f64),
                at: timestamp(&r.date)?,
            })
        })
        .collect();
    stops.sort_by_key(|s| (s.at, s.car));
    stops.dedup_by_key(|s| (s.at, s.car));
    stops
}
