//! OpenF1 Feed Source
//!
//! Live telemetry adapter. Every endpoint is queried by `session_key` and the
//! payload handed to the matching normalizer in [`feeds`].

pub mod feeds;

use crate::application::config::LiveConfig;
use crate::domain::entity::{
    CarPosition, IntervalRecord, LapRecord, PitStop, RadioMessage, RawRaceControl, Session,
    SessionStatus, TyreStint, WeatherSample,
};
use crate::domain::repository::{FeedResult, LiveFeedSource};
use chrono::Utc;
use kernel::id::SessionKey;
use platform::{FetchError, Provider, UpstreamClient};
use serde::de::DeserializeOwned;

/// OpenF1-backed feed source
#[derive(Debug, Clone)]
pub struct OpenF1Source {
    client: UpstreamClient,
    provider: Provider,
    live_buffer: chrono::Duration,
    radio_window: usize,
}

impl OpenF1Source {
    pub fn new(client: UpstreamClient, config: &LiveConfig) -> Self {
        Self {
            client,
            provider: Provider::new("openf1", config.api_base.clone()),
            live_buffer: config.live_buffer(),
            radio_window: config.radio_window,
        }
    }

    /// Fetch a list endpoint for one session. OpenF1 answers 404 when a
    /// session has no records yet, which is an empty list here. Rows are
    /// decoded one by one so a single malformed row only loses itself.
    async fn list<T>(&self, endpoint: &str, session_key: String) -> FeedResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let params = [("session_key", session_key)];
        match self.client.fetch::<Vec<serde_json::Value>>(&self.provider, endpoint, &params).await {
            Ok(rows) => Ok(feeds::decode_rows(endpoint, rows)),
            Err(FetchError::HttpStatus { status: 404 }) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    async fn sessions(&self, session_key: String) -> FeedResult<Vec<Session>> {
        let raw = self.list("sessions", session_key).await?;
        Ok(feeds::session::normalize(raw, Utc::now(), self.live_buffer))
    }
}

impl LiveFeedSource for OpenF1Source {
    async fn latest_session(&self) -> FeedResult<Option<Session>> {
        Ok(self.sessions("latest".to_string()).await?.pop())
    }

    async fn session(&self, key: SessionKey) -> FeedResult<Option<Session>> {
        Ok(self.sessions(key.to_string()).await?.pop())
    }

    async fn positions(&self, session: &Session) -> FeedResult<Vec<CarPosition>> {
        let raw = self.list("position", session.key.to_string()).await?;
        Ok(feeds::position::normalize(raw))
    }

    async fn position_history(&self, session: &Session) -> FeedResult<Vec<CarPosition>> {
        let raw = self.list("position", session.key.to_string()).await?;
        Ok(feeds::position::history(raw))
    }

    async fn laps(&self, session: &Session) -> FeedResult<Vec<LapRecord>> {
        let raw = self.list("laps", session.key.to_string()).await?;
        Ok(feeds::lap::normalize(raw))
    }

    async fn intervals(&self, session: &Session) -> FeedResult<Vec<IntervalRecord>> {
        let raw = self.list("intervals", session.key.to_string()).await?;
        Ok(feeds::interval::normalize(raw))
    }

    async fn stints(&self, session: &Session) -> FeedResult<Vec<TyreStint>> {
        let raw = self.list("stints", session.key.to_string()).await?;
        let active = session.status == SessionStatus::Active;
        Ok(feeds::stint::normalize(raw, active))
    }

    async fn pit_stops(&self, session: &Session) -> FeedResult<Vec<PitStop>> {
        let raw = self.list("pit", session.key.to_string()).await?;
        Ok(feeds::pit::normalize(raw))
    }

    async fn radio(&self, session: &Session) -> FeedResult<Vec<RadioMessage>> {
        let raw = self.list("team_radio", session.key.to_string()).await?;
        Ok(feeds::radio::normalize(raw, self.radio_window))
    }

    async fn weather(&self, session: &Session) -> FeedResult<Vec<WeatherSample>> {
        let raw = self.list("weather", session.key.to_string()).await?;
        Ok(feeds::weather::normalize(raw))
    }

    async fn race_control(&self, session: &Session) -> FeedResult<Vec<RawRaceControl>> {
        let raw = self.list("race_control", session.key.to_string()).await?;
        Ok(feeds::race_control::normalize(raw))
    }
}
