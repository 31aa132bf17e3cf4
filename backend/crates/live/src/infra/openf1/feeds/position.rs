use super::{car, timestamp};
use crate::domain::entity::CarPosition;
use crate::domain::value_object::CarNumber;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct RawPosition {
    pub driver_number: Option<u32>,
    pub position: Option<u8>,
    pub date: Option<String>,
}

fn records(raw: Vec<RawPosition>) -> impl Iterator<Item = CarPosition> {
    raw.into_iter().filter_map(|r| {
        let position = r.position.filter(|&p| p > 0)?;
        Some(CarPosition {
            car: car(r.driver_number)?,
            position,
            at: timestamp(&r.date)?,
        })
    })
}

/// Latest position per car, in running order.
pub fn normalize(raw: Vec<RawPosition>) -> Vec<CarPosition> {
    let mut latest: HashMap<CarNumber, CarPosition> = HashMap::new();
    for record in records(raw) {
        if latest.get(&record.car).is_none_or(|current| record.at >= current.at) {
            latest.insert(record.car, record);
        }
    }
    let mut positions: Vec<CarPosition> = latest.into_values().collect();
    positions.sort_by_key(|p| (p.position, p.car));
    positions
}

/// All usable records in time order, exact repeats removed.
pub fn history(raw: Vec<RawPosition>) -> Vec<CarPosition> {
    let mut history: Vec<CarPosition> = records(raw).collect();
    history.sort_by_key(|p| (p.at, p.car));
    history.dedup();
    history
}
