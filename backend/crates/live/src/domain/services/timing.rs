//! Timing Summary
//!
//! Reduces the lap feed to one row per driver with personal and session bests.

use crate::domain::entity::{LapRecord, LapTiming, SectorStatus, SectorTime};
use crate::domain::value_object::{CarNumber, LapTime};
use std::collections::BTreeMap;

#[derive(Default)]
struct Bests {
    lap: Option<LapTime>,
    sectors: [Option<LapTime>; 3],
}

impl Bests {
    fn offer(&mut self, lap: &LapRecord) {
        keep_min(&mut self.lap, lap.lap_time);
        for (best, sector) in self.sectors.iter_mut().zip(lap.sectors) {
            keep_min(best, sector);
        }
    }
}

fn keep_min(best: &mut Option<LapTime>, candidate: Option<LapTime>) {
    if let Some(candidate) = candidate
        && best.is_none_or(|b| candidate < b)
    {
        *best = Some(candidate);
    }
}

/// One [`LapTiming`] per car, ordered by car number.
///
/// The row shows the car's highest lap number. `last_lap` is the most recent
/// lap that has a time, since the newest record is usually still running.
pub fn summarize_laps(laps: &[LapRecord]) -> Vec<LapTiming> {
    let mut session = Bests::default();
    let mut personal: BTreeMap<CarNumber, Bests> = BTreeMap::new();
    let mut latest: BTreeMap<CarNumber, &LapRecord> = BTreeMap::new();
    let mut last_timed: BTreeMap<CarNumber, &LapRecord> = BTreeMap::new();

    for lap in laps {
        session.offer(lap);
        personal.entry(lap.car).or_default().offer(lap);

        let newer = |current: &&LapRecord| lap.lap_number > current.lap_number;
        if latest.get(&lap.car).is_none_or(newer) {
            latest.insert(lap.car, lap);
        }
        if lap.lap_time.is_some() && last_timed.get(&lap.car).is_none_or(newer) {
            last_timed.insert(lap.car, lap);
        }
    }

    latest
        .into_iter()
        .map(|(car, lap)| {
            let pb = personal.get(&car);
            let last_lap = last_timed.get(&car).and_then(|l| l.lap_time);
            let best_lap = pb.and_then(|b| b.lap);

            let mut sectors = [None; 3];
            for (i, slot) in sectors.iter_mut().enumerate() {
                *slot = lap.sectors[i].map(|time| SectorTime {
                    time,
                    status: if session.sectors[i] == Some(time) {
                        SectorStatus::SessionBest
                    } else if pb.and_then(|b| b.sectors[i]) == Some(time) {
                        SectorStatus::PersonalBest
                    } else {
                        SectorStatus::Normal
                    },
                });
            }

            LapTiming {
                car,
                lap_number: lap.lap_number,
                last_lap,
                sectors,
                best_lap,
                is_personal_best: last_lap.is_some() && last_lap == best_lap,
                is_session_best: last_lap.is_some() && last_lap == session.lap,
            }
        })
        .collect()
}
