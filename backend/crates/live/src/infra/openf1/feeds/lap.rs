use super::{car, timestamp};
use crate::domain::entity::LapRecord;
use crate::domain::value_object::{CarNumber, LapTime};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct RawLap {
    pub driver_number: Option<u32>,
    pub lap_number: Option<u32>,
    pub date_start: Option<String>,
    pub lap_duration: Option<f64>,
    pub duration_sector_1: Option<f64>,
    pub duration_sector_2: Option<f64>,
    pub duration_sector_3: Option<f64>,
    #[serde(default)]
    pub is_pit_out_lap: Option<bool>,
}

impl RawLap {
    fn timed_fields(&self) -> usize {
        [
            self.lap_duration,
            self.duration_sector_1,
            self.duration_sector_2,
            self.duration_sector_3,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// One record per (car, lap), ordered by car then lap.
///
/// A lap is reported repeatedly while it fills in; the record with the most
/// timed fields is kept, the later one on a tie.
pub fn normalize(raw: Vec<RawLap>) -> Vec<LapRecord> {
    let mut laps: BTreeMap<(CarNumber, u32), RawLap> = BTreeMap::new();
    for r in raw {
        let (Some(car), Some(lap_number)) = (car(r.driver_number), r.lap_number) else {
            continue;
        };
        match laps.get(&(car, lap_number)) {
            Some(existing) if existing.timed_fields() > r.timed_fields() => {}
            _ => {
                laps.insert((car, lap_number), r);
            }
        }
    }

    laps.into_iter()
        .map(|((car, lap_number), r)| LapRecord {
            car,
            lap_number,
            started_at: timestamp(&r.date_start),
            lap_time: r.lap_duration.and_then(LapTime::from_secs_f64),
            sectors: [
                r.duration_sector_1.and_then(LapTime::from_secs_f64),
                r.duration_sector_2.and_then(LapTime::from_secs_f64),
                r.duration_sector_3.and_then(LapTime::from_secs_f64),
            ],
            is_pit_out_lap: r.is_pit_out_lap.unwrap_or(false),
        })
        .collect()
}
