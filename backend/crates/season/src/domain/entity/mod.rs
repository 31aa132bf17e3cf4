pub mod race;
pub mod result;
pub mod standing;

pub use race::{Race, Schedule, SessionSlot, WeekendSession};
pub use result::{
    DriverRaceResult, FastestLap, QualifyingEntry, QualifyingResults, RaceResultEntry, RaceResults, Round,
    SeasonStats,
};
pub use standing::{ConstructorStanding, DriverProfile, DriverStanding, Standings};
