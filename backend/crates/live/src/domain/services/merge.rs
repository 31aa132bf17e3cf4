//! Driver Merge
//!
//! Joins the per-feed records into timing tower rows. The position feed
//! decides which cars appear; every other feed only adds fields.

use crate::domain::entity::{
    CarPosition, DriverLive, IntervalRecord, LapTiming, PitStop, TyreStint, TyreState,
};
use crate::domain::roster;
use crate::domain::value_object::CarNumber;
use std::collections::HashMap;

/// Feeds a snapshot is merged from; absent feeds are empty slices.
#[derive(Debug, Default, Clone, Copy)]
pub struct DriverFeeds<'a> {
    pub positions: &'a [CarPosition],
    pub timing: &'a [LapTiming],
    pub intervals: &'a [IntervalRecord],
    pub stints: &'a [TyreStint],
    pub pit_stops: &'a [PitStop],
}

/// One row per car in running order. A car listed twice in `positions` keeps
/// its most recent record.
pub fn build_drivers(feeds: DriverFeeds<'_>) -> Vec<DriverLive> {
    let mut latest: HashMap<CarNumber, &CarPosition> = HashMap::new();
    for p in feeds.positions {
        if latest.get(&p.car).is_none_or(|current| p.at >= current.at) {
            latest.insert(p.car, p);
        }
    }
    let mut order: Vec<&CarPosition> = latest.into_values().collect();
    order.sort_by_key(|p| (p.position, p.car));

    order
        .into_iter()
        .map(|p| {
            let enrichment = roster::enrich(p.car);
            let mut row = DriverLive {
                car: p.car,
                code: enrichment.code,
                name: enrichment.name,
                team: enrichment.team,
                team_colour: enrichment.team_colour,
                position: p.position,
                gap_to_leader: None,
                interval: None,
                lap_number: None,
                last_lap: None,
                best_lap: None,
                sectors: [None; 3],
                is_personal_best: false,
                is_session_best: false,
                tyre: None,
                pit_stops: 0,
                last_pit_duration: None,
            };

            if let Some(timing) = feeds.timing.iter().find(|t| t.car == p.car) {
                row.apply_timing(timing);
            }
            if let Some(gap) = feeds
                .intervals
                .iter()
                .filter(|i| i.car == p.car)
                .max_by_key(|i| i.at)
            {
                row.gap_to_leader = gap.gap_to_leader;
                row.interval = gap.interval;
            }

            row.tyre = current_tyre(feeds.stints, p.car, row.lap_number);

            let mut stops: Vec<&PitStop> = feeds.pit_stops.iter().filter(|s| s.car == p.car).collect();
            stops.sort_by_key(|s| s.at);
            row.pit_stops = stops.len() as u32;
            row.last_pit_duration = stops.last().and_then(|s| s.duration);

            row
        })
        .collect()
}

/// Tyre on the car now: its highest-numbered stint, aged to `current_lap`.
pub fn current_tyre(stints: &[TyreStint], car: CarNumber, current_lap: Option<u32>) -> Option<TyreState> {
    stints
        .iter()
        .filter(|s| s.car == car)
        .max_by_key(|s| s.stint_number)
        .map(|s| TyreState {
            compound: s.compound,
            age_laps: s.age_at(current_lap),
            stint_number: s.stint_number,
        })
}
