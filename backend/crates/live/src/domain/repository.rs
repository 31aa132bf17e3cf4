//! Feed Source Trait
//!
//! Interface to a provider of live session data. The OpenF1 adapter and the
//! synthetic demo feed both implement it, so the orchestrator has one code
//! path for live and demo sessions.

use crate::domain::entity::{
    CarPosition, IntervalRecord, LapRecord, PitStop, RadioMessage, RawRaceControl, Session,
    TyreStint, WeatherSample,
};
use kernel::id::SessionKey;
use platform::FetchError;

pub type FeedResult<T> = Result<T, FetchError>;

/// Live feed source trait
#[trait_variant::make(LiveFeedSource: Send)]
pub trait LocalLiveFeedSource {
    /// Most recent session announced by the provider, if any
    async fn latest_session(&self) -> FeedResult<Option<Session>>;

    /// A specific session by key
    async fn session(&self, key: SessionKey) -> FeedResult<Option<Session>>;

    /// Latest position per car
    async fn positions(&self, session: &Session) -> FeedResult<Vec<CarPosition>>;

    /// Every position record of the session in time order
    async fn position_history(&self, session: &Session) -> FeedResult<Vec<CarPosition>>;

    /// All laps so far, one record per (car, lap)
    async fn laps(&self, session: &Session) -> FeedResult<Vec<LapRecord>>;

    /// Latest gap record per car
    async fn intervals(&self, session: &Session) -> FeedResult<Vec<IntervalRecord>>;

    /// Stints ordered by car then stint number
    async fn stints(&self, session: &Session) -> FeedResult<Vec<TyreStint>>;

    async fn pit_stops(&self, session: &Session) -> FeedResult<Vec<PitStop>>;

    /// Newest radio clips, oldest first
    async fn radio(&self, session: &Session) -> FeedResult<Vec<RadioMessage>>;

    /// Weather samples in time order
    async fn weather(&self, session: &Session) -> FeedResult<Vec<WeatherSample>>;

    /// Untranslated race-control messages in time order
    async fn race_control(&self, session: &Session) -> FeedResult<Vec<RawRaceControl>>;
}
