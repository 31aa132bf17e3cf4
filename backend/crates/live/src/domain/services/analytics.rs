//! Session Analytics
//!
//! Per-lap views over a whole session for comparison charts: lap times with
//! the compound each lap was driven on, and running position at each lap.

use crate::domain::entity::{CarPosition, LapRecord, TyreStint};
use crate::domain::roster;
use crate::domain::value_object::{CarNumber, LapTime, TyreCompound};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapPoint {
    pub lap: u32,
    pub time: Option<LapTime>,
    pub sectors: [Option<LapTime>; 3],
    pub compound: TyreCompound,
    pub is_pit_out_lap: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLapTimes {
    pub car: CarNumber,
    pub code: String,
    pub team: String,
    pub team_colour: String,
    pub laps: Vec<LapPoint>,
    pub personal_best: Option<LapTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapTimeChart {
    pub drivers: Vec<DriverLapTimes>,
    pub session_best: Option<LapTime>,
    pub total_laps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LapPosition {
    pub lap: u32,
    pub position: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPositions {
    pub car: CarNumber,
    pub code: String,
    pub team_colour: String,
    pub positions: Vec<LapPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionChart {
    pub drivers: Vec<DriverPositions>,
    pub total_laps: u32,
}

/// Compound `car` was on during `lap`; an open stint runs to the end.
fn compound_on(stints: &[TyreStint], car: CarNumber, lap: u32) -> TyreCompound {
    stints
        .iter()
        .find(|s| s.car == car && s.lap_start <= lap && s.lap_end.is_none_or(|end| lap <= end))
        .map_or(TyreCompound::Unknown, |s| s.compound)
}

/// Lap times per driver, ordered by car number. `only` limits the chart to
/// the given cars; the session best is then the best among them.
pub fn lap_time_chart(laps: &[LapRecord], stints: &[TyreStint], only: Option<&[CarNumber]>) -> LapTimeChart {
    let mut by_car: BTreeMap<CarNumber, Vec<LapPoint>> = BTreeMap::new();
    for lap in laps {
        if only.is_some_and(|cars| !cars.contains(&lap.car)) {
            continue;
        }
        by_car.entry(lap.car).or_default().push(LapPoint {
            lap: lap.lap_number,
            time: lap.lap_time,
            sectors: lap.sectors,
            compound: compound_on(stints, lap.car, lap.lap_number),
            is_pit_out_lap: lap.is_pit_out_lap,
        });
    }

    let mut total_laps = 0;
    let drivers: Vec<DriverLapTimes> = by_car
        .into_iter()
        .map(|(car, mut laps)| {
            laps.sort_by_key(|l| l.lap);
            laps.dedup_by_key(|l| l.lap);
            total_laps = total_laps.max(laps.last().map_or(0, |l| l.lap));
            let enrichment = roster::enrich(car);
            DriverLapTimes {
                car,
                code: enrichment.code,
                team: enrichment.team,
                team_colour: enrichment.team_colour,
                personal_best: laps.iter().filter_map(|l| l.time).min(),
                laps,
            }
        })
        .collect();

    LapTimeChart {
        session_best: drivers.iter().filter_map(|d| d.personal_best).min(),
        drivers,
        total_laps,
    }
}

/// Running position of every car at the start of each of its laps.
///
/// A lap takes the latest position record at or before the lap started. Laps
/// starting before the car's first record take that first record (the grid
/// slot is usually published just after the lights).
pub fn position_chart(laps: &[LapRecord], history: &[CarPosition]) -> PositionChart {
    let mut records: BTreeMap<CarNumber, Vec<&CarPosition>> = BTreeMap::new();
    for record in history {
        records.entry(record.car).or_default().push(record);
    }
    for list in records.values_mut() {
        list.sort_by_key(|r| r.at);
    }

    let mut starts: BTreeMap<CarNumber, BTreeMap<u32, DateTime<Utc>>> = BTreeMap::new();
    let mut total_laps = 0;
    for lap in laps {
        total_laps = total_laps.max(lap.lap_number);
        if let Some(started_at) = lap.started_at {
            starts.entry(lap.car).or_default().insert(lap.lap_number, started_at);
        }
    }

    let drivers = starts
        .into_iter()
        .filter_map(|(car, laps)| {
            let list = records.get(&car)?;
            let first = list.first()?;
            let positions = laps
                .into_iter()
                .map(|(lap, started_at)| {
                    let at_start = list.iter().rev().find(|r| r.at <= started_at).unwrap_or(first);
                    LapPosition {
                        lap,
                        position: at_start.position,
                    }
                })
                .collect();
            let enrichment = roster::enrich(car);
            Some(DriverPositions {
                car,
                code: enrichment.code,
                team_colour: enrichment.team_colour,
                positions,
            })
        })
        .collect();

    PositionChart { drivers, total_laps }
}
