//! Season Service
//!
//! Cached reads of the historical provider. Schedule flags (`is_past`,
//! `is_next`) depend on the current time, so they are applied on every read
//! rather than cached.
//!
//! Results of a numbered round do not change once published and are kept for
//! the results ttl; the latest round follows the standings ttl so a new
//! race shows up together with the table it updates.

use crate::application::config::SeasonConfig;
use crate::domain::entity::{
    ConstructorStanding, DriverProfile, DriverRaceResult, DriverStanding, QualifyingResults, Race,
    RaceResults, Round, Schedule, Standings,
};
use crate::domain::repository::SeasonSource;
use crate::domain::results::season_stats;
use crate::domain::schedule::{mark_schedule, next_race};
use crate::error::{SeasonError, SeasonResult};
use chrono::Utc;
use platform::{CacheStats, FetchError, Lookup, TtlCache};
use std::sync::Arc;
use std::time::Duration;

const SCHEDULE_KEY: &str = "season:schedule";
const NEXT_RACE_KEY: &str = "season:next_race";
const DRIVERS_KEY: &str = "season:standings:drivers";
const CONSTRUCTORS_KEY: &str = "season:standings:constructors";
const RESULTS_PREFIX: &str = "season:results:";
const QUALIFYING_PREFIX: &str = "season:qualifying:";
const DRIVER_RESULTS_PREFIX: &str = "season:driver_results:";

/// Season service (use case)
pub struct SeasonService<S> {
    source: Arc<S>,
    config: SeasonConfig,
    schedule: TtlCache<Schedule>,
    next_race: TtlCache<Option<Race>>,
    drivers: TtlCache<Standings<DriverStanding>>,
    constructors: TtlCache<Standings<ConstructorStanding>>,
    results: TtlCache<Option<RaceResults>>,
    qualifying: TtlCache<Option<QualifyingResults>>,
    driver_results: TtlCache<Vec<DriverRaceResult>>,
}

async fn cached_schedule<S>(
    cache: &TtlCache<Schedule>,
    source: &Arc<S>,
    ttl: Duration,
) -> Result<Lookup<Schedule>, FetchError>
where
    S: SeasonSource + Send + Sync + 'static,
{
    let source = Arc::clone(source);
    cache
        .get_or_fetch(SCHEDULE_KEY, ttl, move || async move { source.schedule().await })
        .await
}

fn unavailable(resource: &'static str) -> impl FnOnce(FetchError) -> SeasonError {
    move |source| SeasonError::Unavailable { resource, source }
}

impl<S> SeasonService<S>
where
    S: SeasonSource + Send + Sync + 'static,
{
    pub fn new(source: S, config: SeasonConfig) -> Self {
        let grace = config.stale_grace;
        Self {
            source: Arc::new(source),
            config,
            schedule: TtlCache::new("schedule", grace),
            next_race: TtlCache::new("next_race", grace),
            drivers: TtlCache::new("driver_standings", grace),
            constructors: TtlCache::new("constructor_standings", grace),
            results: TtlCache::new("race_results", grace),
            qualifying: TtlCache::new("qualifying_results", grace),
            driver_results: TtlCache::new("driver_results", grace),
        }
    }

    /// Full season schedule with past/next flags as of now.
    pub async fn get_schedule(&self) -> SeasonResult<Schedule> {
        let lookup = cached_schedule(&self.schedule, &self.source, self.config.schedule_ttl)
            .await
            .map_err(unavailable("schedule"))?;
        let mut schedule = Schedule::clone(&lookup.value);
        mark_schedule(&mut schedule.races, Utc::now());
        Ok(schedule)
    }

    /// The upcoming race, or the one running now. `None` once the season is
    /// over.
    pub async fn get_next_race(&self) -> SeasonResult<Option<Race>> {
        let schedule = self.schedule.clone();
        let source = Arc::clone(&self.source);
        let schedule_ttl = self.config.schedule_ttl;

        let lookup = self
            .next_race
            .get_or_fetch(NEXT_RACE_KEY, self.config.next_race_ttl, move || async move {
                let lookup = cached_schedule(&schedule, &source, schedule_ttl).await?;
                let now = Utc::now();
                let mut races = lookup.value.races.clone();
                mark_schedule(&mut races, now);
                Ok(next_race(&races, now))
            })
            .await
            .map_err(unavailable("next race"))?;
        Ok(Option::clone(&lookup.value))
    }

    pub async fn get_driver_standings(&self) -> SeasonResult<Standings<DriverStanding>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .drivers
            .get_or_fetch(DRIVERS_KEY, self.config.standings_ttl, move || async move {
                source.driver_standings().await
            })
            .await
            .map_err(unavailable("driver standings"))?;
        Ok(Standings::clone(&lookup.value))
    }

    pub async fn get_constructor_standings(&self) -> SeasonResult<Standings<ConstructorStanding>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .constructors
            .get_or_fetch(CONSTRUCTORS_KEY, self.config.standings_ttl, move || async move {
                source.constructor_standings().await
            })
            .await
            .map_err(unavailable("constructor standings"))?;
        Ok(Standings::clone(&lookup.value))
    }

    /// Classification of one round, or of the latest round with results.
    pub async fn get_race_results(&self, round: Round) -> SeasonResult<RaceResults> {
        if round == Round::Number(0) {
            return Err(SeasonError::NotFound("round 0".to_string()));
        }
        let ttl = match round {
            Round::Last => self.config.standings_ttl,
            Round::Number(_) => self.config.results_ttl,
        };
        let source = Arc::clone(&self.source);
        let lookup = self
            .results
            .get_or_fetch(&format!("{RESULTS_PREFIX}{round}"), ttl, move || async move {
                source.race_results(round).await
            })
            .await
            .map_err(unavailable("race results"))?;
        Option::clone(&lookup.value)
            .ok_or_else(|| SeasonError::NotFound(format!("results for round {round}")))
    }

    pub async fn get_qualifying_results(&self, round: u32) -> SeasonResult<QualifyingResults> {
        if round == 0 {
            return Err(SeasonError::NotFound("round 0".to_string()));
        }
        let source = Arc::clone(&self.source);
        let lookup = self
            .qualifying
            .get_or_fetch(
                &format!("{QUALIFYING_PREFIX}{round}"),
                self.config.results_ttl,
                move || async move { source.qualifying_results(round).await },
            )
            .await
            .map_err(unavailable("qualifying results"))?;
        Option::clone(&lookup.value)
            .ok_or_else(|| SeasonError::NotFound(format!("qualifying for round {round}")))
    }

    /// Standing, season record and team-mate of the driver racing with
    /// permanent `number`.
    pub async fn get_driver_profile(&self, number: u32) -> SeasonResult<DriverProfile> {
        let standings = self.get_driver_standings().await?;
        let Some(driver) = standings.entries.iter().find(|d| d.number == Some(number)).cloned() else {
            return Err(SeasonError::NotFound(format!("driver #{number}")));
        };

        let source = Arc::clone(&self.source);
        let driver_id = driver.driver_id.clone();
        let lookup = self
            .driver_results
            .get_or_fetch(
                &format!("{DRIVER_RESULTS_PREFIX}{driver_id}"),
                self.config.results_ttl,
                move || async move { source.driver_results(&driver_id).await },
            )
            .await
            .map_err(unavailable("driver results"))?;

        // Best-placed other driver of the same team; mid-season swaps leave
        // more than one.
        let teammate = standings
            .entries
            .into_iter()
            .find(|d| d.team == driver.team && d.driver_id != driver.driver_id);

        Ok(DriverProfile {
            stats: season_stats(Vec::clone(&lookup.value)),
            driver,
            teammate,
        })
    }

    /// Summed counters of every season cache
    pub fn cache_stats(&self) -> CacheStats {
        [
            self.schedule.stats(),
            self.next_race.stats(),
            self.drivers.stats(),
            self.constructors.stats(),
            self.results.stats(),
            self.qualifying.stats(),
            self.driver_results.stats(),
        ]
        .into_iter()
        .sum()
    }
}
