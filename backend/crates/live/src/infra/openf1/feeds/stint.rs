use super::car;
use crate::domain::entity::TyreStint;
use crate::domain::value_object::{CarNumber, TyreCompound};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct RawStint {
    pub driver_number: Option<u32>,
    pub stint_number: Option<u32>,
    pub compound: Option<String>,
    pub lap_start: Option<u32>,
    pub lap_end: Option<u32>,
    pub tyre_age_at_start: Option<u32>,
}

/// Stints ordered by car then stint number, repaired to be contiguous.
///
/// Upstream keeps extending `lap_end` of the running stint; while the session
/// is active the last stint of each car is reported as open instead.
pub fn normalize(raw: Vec<RawStint>, session_active: bool) -> Vec<TyreStint> {
    let mut by_car: BTreeMap<CarNumber, BTreeMap<u32, TyreStint>> = BTreeMap::new();
    for r in raw {
        let (Some(car), Some(stint_number)) = (car(r.driver_number), r.stint_number) else {
            continue;
        };
        let lap_start = r.lap_start.unwrap_or(1).max(1);
        by_car.entry(car).or_default().insert(
            stint_number,
            TyreStint {
                car,
                stint_number,
                compound: r.compound.as_deref().map_or(TyreCompound::Unknown, TyreCompound::from_upstream),
                lap_start,
                lap_end: r.lap_end.map(|end| end.max(lap_start)),
                tyre_age_at_start: r.tyre_age_at_start.unwrap_or(0),
            },
        );
    }

    by_car
        .into_values()
        .flat_map(|stints| repair(stints.into_values().collect(), session_active))
        .collect()
}

/// Close every stint on the lap before the next one starts.
fn repair(mut stints: Vec<TyreStint>, session_active: bool) -> Vec<TyreStint> {
    for i in 1..stints.len() {
        let prev_start = stints[i - 1].lap_start;
        let next_start = stints[i].lap_start;
        let prev_end = next_start.saturating_sub(1).max(prev_start);
        stints[i - 1].lap_end = Some(prev_end);

        let next = &mut stints[i];
        next.lap_start = prev_end + 1;
        if let Some(end) = next.lap_end {
            next.lap_end = Some(end.max(next.lap_start));
        }
    }
    if session_active && let Some(last) = stints.last_mut() {
        last.lap_end = None;
    }
    stints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::validate_stints;

    const PAYLOAD: &str = r#"[
        {"driver_number": 1, "stint_number": 1, "compound": "MEDIUM", "lap_start": 1, "lap_end": 20, "tyre_age_at_start": 0},
        {"driver_number": 1, "stint_number": 2, "compound": "HARD", "lap_start": 22, "lap_end": 35, "tyre_age_at_start": 0},
        {"driver_number": 1, "stint_number": 3, "compound": "SOFT", "lap_start": 36, "lap_end": 41, "tyre_age_at_start": 3},
        {"driver_number": 4, "stint_number": 2, "compound": "hard", "lap_start": 19, "lap_end": null, "tyre_age_at_start": 0},
        {"driver_number": 4, "stint_number": 1, "compound": "MEDIUM", "lap_start": 1, "lap_end": null, "tyre_age_at_start": 0}
    ]"#;

    #[test]
    fn test_active_session_leaves_last_open() {
        let raw: Vec<RawStint> = serde_json::from_str(PAYLOAD).unwrap();
        let stints = normalize(raw, true);
        assert_eq!(stints.len(), 5);

        let ver: Vec<_> = stints.iter().filter(|s| s.car.get() == 1).cloned().collect();
        validate_stints(&ver).unwrap();
        assert_eq!(ver[0].lap_end, Some(21));
        assert_eq!(ver[2].lap_end, None);
        assert_eq!(ver[2].compound, TyreCompound::Soft);

        let nor: Vec<_> = stints.iter().filter(|s| s.car.get() == 4).cloned().collect();
        validate_stints(&nor).unwrap();
        assert_eq!(nor[0].lap_end, Some(18));
        assert_eq!(nor[1].compound, TyreCompound::Hard);
    }

    #[test]
    fn test_ended_session_keeps_final_lap() {
        let raw: Vec<RawStint> = serde_json::from_str(PAYLOAD).unwrap();
        let stints = normalize(raw, false);
        let last = stints.iter().find(|s| s.car.get() == 1 && s.stint_number == 3).unwrap();
        assert_eq!(last.lap_end, Some(41));
    }
}
