//! Schedule Rules

use crate::domain::entity::Race;
use chrono::{DateTime, Duration, Utc};

/// A race still counts as upcoming this long after its start.
pub const NEXT_RACE_WINDOW_HOURS: i64 = 6;

/// Set `is_past` on every race that has started and `is_next` on the first
/// one that has not.
pub fn mark_schedule(races: &mut [Race], now: DateTime<Utc>) {
    let mut next_marked = false;
    for race in races.iter_mut() {
        race.is_past = race.starts_at < now;
        race.is_next = !race.is_past && !next_marked;
        next_marked |= race.is_next;
    }
}

/// The race to show as "next": the first one that started less than
/// [`NEXT_RACE_WINDOW_HOURS`] ago or has not started yet.
pub fn next_race(races: &[Race], now: DateTime<Utc>) -> Option<Race> {
    races
        .iter()
        .find(|r| r.starts_at + Duration::hours(NEXT_RACE_WINDOW_HOURS) > now)
        .cloned()
}
