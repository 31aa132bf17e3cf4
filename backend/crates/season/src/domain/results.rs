//! Result Rules

use crate::domain::entity::{DriverRaceResult, RaceResultEntry, SeasonStats};

/// Classified finish: `Finished`, or a lapped finisher (`+1 Lap`, `+2 Laps`,
/// newer seasons just `Lapped`). Everything else is a retirement.
pub fn is_finished(status: &str) -> bool {
    let status = status.trim();
    if status == "Finished" || status == "Lapped" {
        return true;
    }
    status
        .strip_prefix('+')
        .and_then(|rest| rest.strip_suffix(" Laps").or_else(|| rest.strip_suffix(" Lap")))
        .is_some_and(|n| n.parse::<u32>().is_ok())
}

/// Retirements, fastest-lap holder and race distance of a classification.
pub fn summarize(results: &[RaceResultEntry]) -> (usize, Option<u32>, u32) {
    let dnf_count = results.iter().filter(|r| r.is_dnf).count();
    let fastest = results
        .iter()
        .find(|r| r.fastest_lap.as_ref().is_some_and(|f| f.rank == 1))
        .and_then(|r| r.number);
    let total_laps = results.iter().map(|r| r.laps).max().unwrap_or(0);
    (dnf_count, fastest, total_laps)
}

pub fn season_stats(mut results: Vec<DriverRaceResult>) -> SeasonStats {
    results.sort_by_key(|r| r.round);
    let count = |pred: fn(&DriverRaceResult) -> bool| results.iter().filter(|r| pred(r)).count() as u32;
    SeasonStats {
        races: results.len(),
        points: results.iter().map(|r| r.points).sum(),
        wins: count(|r| r.position == 1),
        podiums: count(|r| r.position <= 3),
        dnfs: count(|r| !is_finished(&r.status)),
        best_finish: results.iter().map(|r| r.position).min(),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(round: u32, position: u32, points: f64, status: &str) -> DriverRaceResult {
        DriverRaceResult {
            round,
            race: format!("Round {round}"),
            position,
            grid: position,
            points,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_finish_statuses() {
        for status in ["Finished", "+1 Lap", "+2 Laps", "+5 Laps", "Lapped"] {
            assert!(is_finished(status), "{status}");
        }
        for status in ["Engine", "Collision", "Did not start", "+ Laps", "Disqualified"] {
            assert!(!is_finished(status), "{status}");
        }
    }

    #[test]
    fn test_season_stats() {
        let stats = season_stats(vec![
            result(3, 2, 18.0, "Finished"),
            result(1, 1, 25.0, "Finished"),
            result(2, 17, 0.0, "Hydraulics"),
            result(4, 11, 0.0, "+1 Lap"),
        ]);
        assert_eq!(stats.races, 4);
        assert_eq!(stats.points, 43.0);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.podiums, 2);
        assert_eq!(stats.dnfs, 1);
        assert_eq!(stats.best_finish, Some(1));
        let rounds: Vec<u32> = stats.results.iter().map(|r| r.round).collect();
        assert_eq!(rounds, [1, 2, 3, 4]);
    }

    #[test]
    fn test_no_races_has_no_best_finish() {
        let stats = season_stats(Vec::new());
        assert_eq!(stats.races, 0);
        assert_eq!(stats.best_finish, None);
    }
}
