//! Season Source Trait

use crate::domain::entity::{
    ConstructorStanding, DriverRaceResult, DriverStanding, QualifyingResults, RaceResults, Round,
    Schedule, Standings,
};
use platform::FetchError;

pub type SourceResult<T> = Result<T, FetchError>;

/// Historical statistics provider
#[trait_variant::make(SeasonSource: Send)]
pub trait LocalSeasonSource {
    /// Every round of the season, in round order, without past/next flags
    async fn schedule(&self) -> SourceResult<Schedule>;

    async fn driver_standings(&self) -> SourceResult<Standings<DriverStanding>>;

    async fn constructor_standings(&self) -> SourceResult<Standings<ConstructorStanding>>;

    /// Race classification; `None` when the round has no results yet
    async fn race_results(&self, round: Round) -> SourceResult<Option<RaceResults>>;

    async fn qualifying_results(&self, round: u32) -> SourceResult<Option<QualifyingResults>>;

    /// Every race result of one driver this season, by provider driver id
    async fn driver_results(&self, driver_id: &str) -> SourceResult<Vec<DriverRaceResult>>;
}
