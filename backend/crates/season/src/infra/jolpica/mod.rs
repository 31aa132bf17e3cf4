//! Jolpica Source
//!
//! Ergast-compatible historical statistics. The provider enforces
//! 4 requests/s and 200/hour, so the provider handle carries a rate limiter
//! shared by every request made through it.

pub mod payload;

use crate::application::config::SeasonConfig;
use crate::domain::entity::{
    ConstructorStanding, DriverRaceResult, DriverStanding, QualifyingResults, RaceResults, Round,
    Schedule, Standings,
};
use crate::domain::repository::{SeasonSource, SourceResult};
use platform::{Provider, RateLimiter, UpstreamClient};
use std::sync::Arc;

/// Jolpica-backed season source
#[derive(Debug, Clone)]
pub struct JolpicaSource {
    client: UpstreamClient,
    provider: Provider,
    season: String,
}

impl JolpicaSource {
    pub fn new(client: UpstreamClient, config: &SeasonConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.rate_limits.clone()));
        Self {
            client,
            provider: Provider::new("jolpica", config.api_base.clone()).with_rate_limiter(limiter),
            season: config.season.clone(),
        }
    }

    async fn races(&self, path: &str, params: &[(&str, String)]) -> SourceResult<payload::RaceData> {
        let envelope: payload::Envelope<payload::RaceData> =
            self.client.fetch(&self.provider, &self.endpoint(path), params).await?;
        Ok(envelope.data)
    }

    fn endpoint(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}.json", self.season)
        } else {
            format!("{}/{}.json", self.season, path)
        }
    }
}

impl SeasonSource for JolpicaSource {
    async fn schedule(&self) -> SourceResult<Schedule> {
        let envelope: payload::Envelope<payload::RaceData> =
            self.client.fetch(&self.provider, &self.endpoint(""), &[]).await?;
        Ok(payload::normalize_schedule(envelope.data, &self.season))
    }

    async fn driver_standings(&self) -> SourceResult<Standings<DriverStanding>> {
        let envelope: payload::Envelope<payload::StandingsData> = self
            .client
            .fetch(&self.provider, &self.endpoint("driverStandings"), &[])
            .await?;
        Ok(payload::normalize_driver_standings(envelope.data, &self.season))
    }

    async fn constructor_standings(&self) -> SourceResult<Standings<ConstructorStanding>> {
        let envelope: payload::Envelope<payload::StandingsData> = self
            .client
            .fetch(&self.provider, &self.endpoint("constructorStandings"), &[])
            .await?;
        Ok(payload::normalize_constructor_standings(envelope.data, &self.season))
    }

    async fn race_results(&self, round: Round) -> SourceResult<Option<RaceResults>> {
        let data = self.races(&format!("{round}/results"), &[]).await?;
        Ok(payload::normalize_race_results(data, &self.season))
    }

    async fn qualifying_results(&self, round: u32) -> SourceResult<Option<QualifyingResults>> {
        let data = self.races(&format!("{round}/qualifying"), &[]).await?;
        Ok(payload::normalize_qualifying(data, &self.season))
    }

    async fn driver_results(&self, driver_id: &str) -> SourceResult<Vec<DriverRaceResult>> {
        // The default page of 30 rows can cut a long season short.
        let params = [("limit", "100".to_string())];
        let data = self.races(&format!("drivers/{driver_id}/results"), &params).await?;
        Ok(payload::normalize_driver_results(data))
    }
}
