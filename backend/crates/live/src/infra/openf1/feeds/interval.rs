use super::{car, timestamp};
use crate::domain::entity::{Gap, IntervalRecord};
use crate::domain::value_object::CarNumber;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct RawInterval {
    pub driver_number: Option<u32>,
    /// Seconds, `"+N LAP(S)"` or null for the leader
    #[serde(default)]
    pub gap_to_leader: serde_json::Value,
    #[serde(default)]
    pub interval: serde_json::Value,
    pub date: Option<String>,
}

/// Latest gap record per car, ordered by car number.
pub fn normalize(raw: Vec<RawInterval>) -> Vec<IntervalRecord> {
    let mut latest: HashMap<CarNumber, IntervalRecord> = HashMap::new();
    for r in raw {
        let (Some(car), Some(at)) = (car(r.driver_number), timestamp(&r.date)) else {
            continue;
        };
        if latest.get(&car).is_some_and(|current| current.at > at) {
            continue;
        }
        latest.insert(
            car,
            IntervalRecord {
                car,
                gap_to_leader: Gap::from_upstream(&r.gap_to_leader),
                interval: Gap::from_upstream(&r.interval),
                at,
            },
        );
    }
    let mut intervals: Vec<IntervalRecord> = latest.into_values().collect();
    intervals.sort_by_key(|i| i.car);
    intervals
}
