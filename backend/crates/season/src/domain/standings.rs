//! Standings Rules

use crate::domain::entity::{ConstructorStanding, DriverStanding};

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Fill points gaps; entries must be in championship order.
pub fn apply_driver_gaps(entries: &mut [DriverStanding]) {
    let Some(leader) = entries.first().map(|e| e.points) else {
        return;
    };
    let mut previous: Option<f64> = None;
    for entry in entries.iter_mut() {
        entry.gap_to_leader = round1(leader - entry.points);
        entry.gap_to_prev = previous.map_or(0.0, |p| round1(p - entry.points));
        previous = Some(entry.points);
    }
}

pub fn apply_constructor_gaps(entries: &mut [ConstructorStanding]) {
    let Some(leader) = entries.first().map(|e| e.points) else {
        return;
    };
    for entry in entries.iter_mut() {
        entry.gap_to_leader = round1(leader - entry.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(position: u32, points: f64) -> DriverStanding {
        DriverStanding {
            position,
            driver_id: String::new(),
            number: None,
            code: None,
            name: String::new(),
            nationality: String::new(),
            team: String::new(),
            team_colour: "#888888",
            points,
            wins: 0,
            gap_to_leader: 0.0,
            gap_to_prev: 0.0,
        }
    }

    #[test]
    fn test_driver_gaps() {
        let mut entries = vec![driver(1, 437.0), driver(2, 374.0), driver(3, 356.5)];
        apply_driver_gaps(&mut entries);
        let gaps: Vec<_> = entries.iter().map(|e| (e.gap_to_leader, e.gap_to_prev)).collect();
        assert_eq!(gaps, vec![(0.0, 0.0), (63.0, 63.0), (80.5, 17.5)]);
    }

    #[test]
    fn test_empty_table() {
        let mut entries: Vec<DriverStanding> = Vec::new();
        apply_driver_gaps(&mut entries);
        assert!(entries.is_empty());
    }
}
