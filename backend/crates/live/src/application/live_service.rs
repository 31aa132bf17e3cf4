//! Live Service
//!
//! One snapshot read: pick the session to serve (live, or demo when nothing
//! is running or the live feed froze), fan out one cached read per feed
//! category under a shared deadline, merge the results by driver. Lap-time
//! and position charts read the same cached feeds for a whole session.
//!
//! Nothing refreshes in the background. Every upstream call is caused by a
//! read, and the cache makes sure a burst of reads costs one call per feed.

use crate::application::config::LiveConfig;
use crate::application::race_control_log::RaceControlLog;
use crate::application::session_tracker::{Phase, SessionTracker};
use crate::domain::entity::{
    CarPosition, FeedCategory, IntervalRecord, LapRecord, LiveSnapshot, PitStop, RaceControlMessage,
    RadioMessage, RawRaceControl, Session, SnapshotMode, TyreStint, WeatherReport, WeatherSample,
};
use crate::domain::repository::{FeedResult, LiveFeedSource};
use crate::domain::roster;
use crate::domain::services::{
    DriverFeeds, LapTimeChart, PositionChart, RaceControlTranslator, build_drivers, lap_time_chart,
    position_chart, summarize_laps,
};
use crate::domain::value_object::CarNumber;
use crate::error::{LiveError, LiveResult};
use crate::infra::demo::DemoFeed;
use chrono::{DateTime, Utc};
use kernel::id::SessionKey;
use parking_lot::Mutex;
use platform::{CacheStats, FetchError, TtlCache};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const LATEST_SESSION_KEY: &str = "live:session:latest";

/// Where a session's data comes from; doubles as the cache key namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedOrigin {
    Live,
    Demo,
}

impl FeedOrigin {
    fn prefix(self) -> &'static str {
        match self {
            FeedOrigin::Live => "live",
            FeedOrigin::Demo => "demo",
        }
    }
}

fn session_prefix(origin: FeedOrigin, key: SessionKey) -> String {
    format!("{}:{}:", origin.prefix(), key)
}

/// Session chosen for one request
#[derive(Debug, Clone)]
struct Route {
    origin: FeedOrigin,
    session: Session,
    /// Named explicitly by the caller rather than tracked
    pinned: bool,
}

impl Route {
    fn cache_key(&self, category: FeedCategory) -> String {
        format!("{}{}", session_prefix(self.origin, self.session.key), category)
    }

    fn history_key(&self) -> String {
        format!("{}position_history", session_prefix(self.origin, self.session.key))
    }
}

/// One cached read, settled against the deadline
enum Section<V> {
    Ready(Arc<V>),
    /// Leftover value; the refresh failed or did not finish in time
    Degraded(Arc<V>, FetchError),
    Missing(FetchError),
}

struct Feeds {
    positions: Section<Vec<CarPosition>>,
    laps: Section<Vec<LapRecord>>,
    intervals: Section<Vec<IntervalRecord>>,
    stints: Section<Vec<TyreStint>>,
    pit_stops: Section<Vec<PitStop>>,
    radio: Section<Vec<RadioMessage>>,
    weather: Section<Vec<WeatherSample>>,
    race_control: Section<Vec<RawRaceControl>>,
}

/// Value of a section the response cannot do without.
fn required<V>(category: FeedCategory, section: Section<V>) -> LiveResult<Arc<V>> {
    match section {
        Section::Ready(value) | Section::Degraded(value, _) => Ok(value),
        Section::Missing(source) => Err(LiveError::CategoryUnavailable { category, source }),
    }
}

/// Section value, recording the category as degraded unless it is current.
fn settle<V: Default>(
    degraded: &mut Vec<FeedCategory>,
    category: FeedCategory,
    section: Section<V>,
) -> Arc<V> {
    match section {
        Section::Ready(value) => value,
        Section::Degraded(value, error) => {
            tracing::debug!(%category, %error, "Serving cached section");
            degraded.push(category);
            value
        }
        Section::Missing(error) => {
            tracing::warn!(%category, %error, "Section unavailable, left empty");
            degraded.push(category);
            Arc::default()
        }
    }
}

/// One cache per feed category
struct FeedCaches {
    sessions: TtlCache<Option<Session>>,
    positions: TtlCache<Vec<CarPosition>>,
    position_history: TtlCache<Vec<CarPosition>>,
    laps: TtlCache<Vec<LapRecord>>,
    intervals: TtlCache<Vec<IntervalRecord>>,
    stints: TtlCache<Vec<TyreStint>>,
    pit_stops: TtlCache<Vec<PitStop>>,
    radio: TtlCache<Vec<RadioMessage>>,
    weather: TtlCache<Vec<WeatherSample>>,
    race_control: TtlCache<Vec<RawRaceControl>>,
}

impl FeedCaches {
    fn new(grace: Duration) -> Self {
        Self {
            sessions: TtlCache::new("sessions", grace),
            positions: TtlCache::new("positions", grace),
            position_history: TtlCache::new("position_history", grace),
            laps: TtlCache::new("laps", grace),
            intervals: TtlCache::new("intervals", grace),
            stints: TtlCache::new("stints", grace),
            pit_stops: TtlCache::new("pit_stops", grace),
            radio: TtlCache::new("radio", grace),
            weather: TtlCache::new("weather", grace),
            race_control: TtlCache::new("race_control", grace),
        }
    }

    /// Drop every feed entry of one session; session lookups stay.
    fn evict(&self, prefix: &str) -> usize {
        self.positions.clear(Some(prefix))
            + self.position_history.clear(Some(prefix))
            + self.laps.clear(Some(prefix))
            + self.intervals.clear(Some(prefix))
            + self.stints.clear(Some(prefix))
            + self.pit_stops.clear(Some(prefix))
            + self.radio.clear(Some(prefix))
            + self.weather.clear(Some(prefix))
            + self.race_control.clear(Some(prefix))
    }

    fn stats(&self) -> CacheStats {
        [
            self.sessions.stats(),
            self.positions.stats(),
            self.position_history.stats(),
            self.laps.stats(),
            self.intervals.stats(),
            self.stints.stats(),
            self.pit_stops.stats(),
            self.radio.stats(),
            self.weather.stats(),
            self.race_control.stats(),
        ]
        .into_iter()
        .sum()
    }
}

#[derive(Debug, Default)]
struct Logs {
    live: RaceControlLog,
    demo: RaceControlLog,
}

impl Logs {
    fn get_mut(&mut self, origin: FeedOrigin) -> &mut RaceControlLog {
        match origin {
            FeedOrigin::Live => &mut self.live,
            FeedOrigin::Demo => &mut self.demo,
        }
    }
}

/// Stints of one driver
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverTyres {
    pub car: CarNumber,
    pub session_key: SessionKey,
    pub origin: FeedOrigin,
    pub stints: Vec<TyreStint>,
}

/// Race-control messages past a sequence number
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceControlFeed {
    pub session_key: SessionKey,
    pub origin: FeedOrigin,
    pub messages: Vec<RaceControlMessage>,
    pub last_seq: u64,
}

/// Chart of one session, labelled with where it came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChart<T> {
    pub session_key: SessionKey,
    pub origin: FeedOrigin,
    #[serde(flatten)]
    pub chart: T,
}

/// Orchestrator state for the health endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveHealth {
    pub phase: &'static str,
    pub session_key: Option<SessionKey>,
    pub cache: CacheStats,
    pub translation_misses: u64,
    pub race_control_seq: u64,
}

/// Live service (use case)
pub struct LiveService<S> {
    source: Arc<S>,
    demo: Arc<DemoFeed>,
    config: LiveConfig,
    caches: FeedCaches,
    tracker: Mutex<SessionTracker>,
    logs: Mutex<Logs>,
    translator: RaceControlTranslator,
}

macro_rules! read_feed {
    ($service:ident, $source:ident, $route:ident, $deadline:ident, $cache:ident, $category:expr, $method:ident) => {{
        let source = Arc::clone($source);
        let session = $route.session.clone();
        $service.read(
            &$service.caches.$cache,
            $route.cache_key($category),
            $service.config.ttls.get($category),
            $deadline,
            move || async move { source.$method(&session).await },
        )
    }};
}

impl<S> LiveService<S>
where
    S: LiveFeedSource + Send + Sync + 'static,
{
    pub fn new(source: S, demo: DemoFeed, config: LiveConfig) -> Self {
        Self {
            source: Arc::new(source),
            demo: Arc::new(demo),
            caches: FeedCaches::new(config.stale_grace),
            tracker: Mutex::new(SessionTracker::new(
                config.stale_after,
                config.session_timeout,
            )),
            logs: Mutex::new(Logs::default()),
            translator: RaceControlTranslator::new(),
            config,
        }
    }

    pub fn config(&self) -> &LiveConfig {
        &self.config
    }

    /// Unified snapshot of the session being served.
    ///
    /// With `hint`, that session is served whether or not it is live; an
    /// unknown key is `SessionNotFound`. Without it, the tracked live session
    /// is served, or the demo session when there is none or its feed froze.
    pub async fn get_live_snapshot(&self, hint: Option<SessionKey>) -> LiveResult<LiveSnapshot> {
        let deadline = Instant::now() + self.config.snapshot_deadline;
        if let Some(key) = hint {
            let route = self.pinned_route(key, deadline).await?;
            return self.assemble(&route, deadline).await;
        }

        match self.current_phase(deadline).await {
            Phase::Live(session) => self.assemble(&Self::live_route(session), deadline).await,
            Phase::Stale(session) => {
                // Fetch anyway: fresh positions are what moves the session back to live.
                match self.assemble(&Self::live_route(session), deadline).await {
                    Ok(snapshot) if matches!(self.tracked_phase(), Phase::Live(_)) => {
                        return Ok(snapshot);
                    }
                    Ok(_) => tracing::debug!("Live feed still frozen, serving demo"),
                    Err(err) => err.log(),
                }
                self.assemble(&self.demo_route(), deadline).await
            }
            Phase::NoSession => self.assemble(&self.demo_route(), deadline).await,
        }
    }

    /// Tyre stints of `car` in the session being served.
    pub async fn get_driver_tyres(&self, car: u32) -> LiveResult<DriverTyres> {
        let number = CarNumber::new(car).ok_or(LiveError::UnknownDriver(car))?;
        let deadline = Instant::now() + self.config.snapshot_deadline;
        let route = self.serving_route(deadline).await;

        let section = match route.origin {
            FeedOrigin::Live => {
                let source = &self.source;
                read_feed!(self, source, route, deadline, stints, FeedCategory::Tyres, stints).await
            }
            FeedOrigin::Demo => {
                let source = &self.demo;
                read_feed!(self, source, route, deadline, stints, FeedCategory::Tyres, stints).await
            }
        };
        let stints = required(FeedCategory::Tyres, section)?;

        let stints: Vec<TyreStint> = stints.iter().filter(|s| s.car == number).cloned().collect();
        if stints.is_empty() && roster::lookup(number).is_none() {
            return Err(LiveError::UnknownDriver(car));
        }
        Ok(DriverTyres {
            car: number,
            session_key: route.session.key,
            origin: route.origin,
            stints,
        })
    }

    /// Race-control messages with a sequence number above `seq`.
    pub async fn get_race_control_since(&self, seq: u64) -> LiveResult<RaceControlFeed> {
        let deadline = Instant::now() + self.config.snapshot_deadline;
        let route = self.serving_route(deadline).await;

        let section = match route.origin {
            FeedOrigin::Live => {
                let source = &self.source;
                read_feed!(self, source, route, deadline, race_control, FeedCategory::RaceControl, race_control).await
            }
            FeedOrigin::Demo => {
                let source = &self.demo;
                read_feed!(self, source, route, deadline, race_control, FeedCategory::RaceControl, race_control).await
            }
        };
        let raw = match section {
            Section::Ready(raw) => raw,
            Section::Degraded(raw, error) => {
                tracing::debug!(%error, "Race control served from cache");
                raw
            }
            Section::Missing(error) => {
                tracing::warn!(%error, "Race control unavailable, serving log only");
                Arc::default()
            }
        };

        let (messages, last_seq, replaced) = {
            let mut logs = self.logs.lock();
            let log = logs.get_mut(route.origin);
            let replaced = log.ingest(route.session.key, &raw, &self.translator);
            (log.since(seq), log.last_seq(), replaced)
        };
        if let Some(previous) = replaced {
            self.caches.evict(&session_prefix(route.origin, previous));
        }
        Ok(RaceControlFeed {
            session_key: route.session.key,
            origin: route.origin,
            messages,
            last_seq,
        })
    }

    /// Lap times of every driver (or only `drivers`) with the compound of
    /// each lap. Without `hint` the session being served is charted.
    pub async fn get_lap_times(
        &self,
        hint: Option<SessionKey>,
        drivers: Option<Vec<u32>>,
    ) -> LiveResult<SessionChart<LapTimeChart>> {
        let only = drivers
            .map(|cars| {
                cars.into_iter()
                    .map(|n| CarNumber::new(n).ok_or_else(|| LiveError::InvalidRequest(format!("car number {n}"))))
                    .collect::<LiveResult<Vec<_>>>()
            })
            .transpose()?;
        let deadline = Instant::now() + self.config.snapshot_deadline;
        let route = self.chart_route(hint, deadline).await?;

        let (laps, stints) = match route.origin {
            FeedOrigin::Live => self.lap_feeds(&self.source, &route, deadline).await,
            FeedOrigin::Demo => self.lap_feeds(&self.demo, &route, deadline).await,
        };
        let laps = required(FeedCategory::Timing, laps)?;
        let stints = match stints {
            Section::Ready(stints) | Section::Degraded(stints, _) => stints,
            Section::Missing(error) => {
                tracing::warn!(%error, "Stints unavailable, compounds left unknown");
                Arc::default()
            }
        };

        Ok(SessionChart {
            session_key: route.session.key,
            origin: route.origin,
            chart: lap_time_chart(&laps, &stints, only.as_deref()),
        })
    }

    /// Running position of every driver at the start of each lap.
    pub async fn get_position_chart(&self, hint: Option<SessionKey>) -> LiveResult<SessionChart<PositionChart>> {
        let deadline = Instant::now() + self.config.snapshot_deadline;
        let route = self.chart_route(hint, deadline).await?;

        let (laps, history) = match route.origin {
            FeedOrigin::Live => self.position_feeds(&self.source, &route, deadline).await,
            FeedOrigin::Demo => self.position_feeds(&self.demo, &route, deadline).await,
        };
        let laps = required(FeedCategory::Timing, laps)?;
        let history = required(FeedCategory::Positions, history)?;

        Ok(SessionChart {
            session_key: route.session.key,
            origin: route.origin,
            chart: position_chart(&laps, &history),
        })
    }

    pub fn health(&self) -> LiveHealth {
        let phase = self.tracked_phase();
        let race_control_seq = {
            let logs = self.logs.lock();
            logs.live.last_seq().max(logs.demo.last_seq())
        };
        LiveHealth {
            phase: phase.name(),
            session_key: phase.session_key(),
            cache: self.caches.stats(),
            translation_misses: self.translator.misses(),
            race_control_seq,
        }
    }

    // ========================================================================
    // Session resolution
    // ========================================================================

    fn live_route(session: Session) -> Route {
        Route {
            origin: FeedOrigin::Live,
            session,
            pinned: false,
        }
    }

    fn demo_route(&self) -> Route {
        Route {
            origin: FeedOrigin::Demo,
            session: self.demo.session_at(self.demo.now()),
            pinned: false,
        }
    }

    /// Live session if one is tracked and flowing, demo otherwise.
    async fn serving_route(&self, deadline: Instant) -> Route {
        match self.current_phase(deadline).await {
            Phase::Live(session) => Self::live_route(session),
            Phase::Stale(_) | Phase::NoSession => self.demo_route(),
        }
    }

    async fn chart_route(&self, hint: Option<SessionKey>, deadline: Instant) -> LiveResult<Route> {
        match hint {
            Some(key) => self.pinned_route(key, deadline).await,
            None => Ok(self.serving_route(deadline).await),
        }
    }

    async fn pinned_route(&self, key: SessionKey, deadline: Instant) -> LiveResult<Route> {
        if DemoFeed::is_demo_key(key) {
            let session = self
                .demo
                .session(key)
                .await
                .map_err(|e| LiveError::Internal(e.to_string()))?
                .ok_or(LiveError::SessionNotFound(key.get()))?;
            return Ok(Route {
                origin: FeedOrigin::Demo,
                session,
                pinned: true,
            });
        }

        let source = Arc::clone(&self.source);
        let section = self
            .read(
                &self.caches.sessions,
                format!("live:session:{key}"),
                self.config.ttls.session,
                deadline,
                move || async move { source.session(key).await },
            )
            .await;
        let session = required(FeedCategory::Session, section)?;
        let session = Option::clone(&session).ok_or(LiveError::SessionNotFound(key.get()))?;
        Ok(Route {
            origin: FeedOrigin::Live,
            session: session.with_status_at(Utc::now(), self.config.live_buffer()),
            pinned: true,
        })
    }

    /// Refresh the provider's view of the active session and advance the
    /// tracker. A failing session lookup with nothing cached leaves the
    /// tracker as it was.
    async fn current_phase(&self, deadline: Instant) -> Phase {
        let source = Arc::clone(&self.source);
        let section = self
            .read(
                &self.caches.sessions,
                LATEST_SESSION_KEY.to_string(),
                self.config.ttls.session,
                deadline,
                move || async move { source.latest_session().await },
            )
            .await;
        let latest = match section {
            Section::Ready(latest) => Some(latest),
            Section::Degraded(latest, error) => {
                tracing::debug!(%error, "Session lookup served from cache");
                Some(latest)
            }
            Section::Missing(error) => {
                tracing::warn!(%error, "Session lookup failed");
                None
            }
        };

        if let Some(latest) = latest {
            let now = Utc::now();
            let buffer = self.config.live_buffer();
            let active = Option::clone(&latest)
                .filter(|s| s.is_live_at(now, buffer))
                .map(|s| s.with_status_at(now, buffer));
            let dropped = self.tracker.lock().observe_session(active);
            if let Some(key) = dropped {
                self.evict_session(key);
            }
        }
        self.tracked_phase()
    }

    fn tracked_phase(&self) -> Phase {
        let (phase, dropped) = self.tracker.lock().phase();
        if let Some(key) = dropped {
            self.evict_session(key);
        }
        phase
    }

    fn evict_session(&self, key: SessionKey) {
        let removed = self.caches.evict(&session_prefix(FeedOrigin::Live, key));
        {
            let mut logs = self.logs.lock();
            if logs.live.session() == Some(key) {
                logs.live.reset();
            }
        }
        tracing::info!(session_key = %key, removed, "Session evicted");
    }

    // ========================================================================
    // Snapshot assembly
    // ========================================================================

    async fn assemble(&self, route: &Route, deadline: Instant) -> LiveResult<LiveSnapshot> {
        let (feeds, generated_at) = match route.origin {
            FeedOrigin::Live => (self.fetch_feeds(&self.source, route, deadline).await, Utc::now()),
            FeedOrigin::Demo => (self.fetch_feeds(&self.demo, route, deadline).await, self.demo.now()),
        };

        let mut degraded = Vec::new();
        let positions = match feeds.positions {
            Section::Missing(source) => {
                return Err(LiveError::CategoryUnavailable {
                    category: FeedCategory::Positions,
                    source,
                });
            }
            section => settle(&mut degraded, FeedCategory::Positions, section),
        };
        let laps = settle(&mut degraded, FeedCategory::Timing, feeds.laps);
        let intervals = settle(&mut degraded, FeedCategory::Intervals, feeds.intervals);
        let stints = settle(&mut degraded, FeedCategory::Tyres, feeds.stints);
        let pit_stops = settle(&mut degraded, FeedCategory::PitStops, feeds.pit_stops);
        let radio = settle(&mut degraded, FeedCategory::Radio, feeds.radio);
        let weather = settle(&mut degraded, FeedCategory::Weather, feeds.weather);
        let race_control = settle(&mut degraded, FeedCategory::RaceControl, feeds.race_control);

        if route.origin == FeedOrigin::Live {
            let marker = progress_marker(&positions);
            self.tracker.lock().observe_progress(route.session.key, marker);
        }

        let timing = summarize_laps(&laps);
        let drivers = build_drivers(DriverFeeds {
            positions: &positions,
            timing: &timing,
            intervals: &intervals,
            stints: &stints,
            pit_stops: &pit_stops,
        });

        let race_control = self.race_control_window(route, &race_control);
        let radio_start = radio.len().saturating_sub(self.config.radio_window);

        let mode = match route.origin {
            FeedOrigin::Demo => SnapshotMode::Demo,
            FeedOrigin::Live if !degraded.is_empty() => SnapshotMode::Degraded,
            FeedOrigin::Live => SnapshotMode::Live,
        };
        if mode == SnapshotMode::Degraded {
            tracing::info!(session_key = %route.session.key, ?degraded, "Snapshot degraded");
        }

        Ok(LiveSnapshot {
            session: route.session.clone(),
            mode,
            degraded,
            drivers,
            weather: WeatherReport::from_samples(weather.to_vec(), self.config.weather_history),
            race_control,
            radio: radio[radio_start..].to_vec(),
            generated_at,
        })
    }

    async fn fetch_feeds<F>(&self, source: &Arc<F>, route: &Route, deadline: Instant) -> Feeds
    where
        F: LiveFeedSource + Send + Sync + 'static,
    {
        let (positions, laps, intervals, stints, pit_stops, radio, weather, race_control) = tokio::join!(
            read_feed!(self, source, route, deadline, positions, FeedCategory::Positions, positions),
            read_feed!(self, source, route, deadline, laps, FeedCategory::Timing, laps),
            read_feed!(self, source, route, deadline, intervals, FeedCategory::Intervals, intervals),
            read_feed!(self, source, route, deadline, stints, FeedCategory::Tyres, stints),
            read_feed!(self, source, route, deadline, pit_stops, FeedCategory::PitStops, pit_stops),
            read_feed!(self, source, route, deadline, radio, FeedCategory::Radio, radio),
            read_feed!(self, source, route, deadline, weather, FeedCategory::Weather, weather),
            read_feed!(self, source, route, deadline, race_control, FeedCategory::RaceControl, race_control),
        );
        Feeds {
            positions,
            laps,
            intervals,
            stints,
            pit_stops,
            radio,
            weather,
            race_control,
        }
    }

    async fn lap_feeds<F>(
        &self,
        source: &Arc<F>,
        route: &Route,
        deadline: Instant,
    ) -> (Section<Vec<LapRecord>>, Section<Vec<TyreStint>>)
    where
        F: LiveFeedSource + Send + Sync + 'static,
    {
        tokio::join!(
            read_feed!(self, source, route, deadline, laps, FeedCategory::Timing, laps),
            read_feed!(self, source, route, deadline, stints, FeedCategory::Tyres, stints),
        )
    }

    async fn position_feeds<F>(
        &self,
        source: &Arc<F>,
        route: &Route,
        deadline: Instant,
    ) -> (Section<Vec<LapRecord>>, Section<Vec<CarPosition>>)
    where
        F: LiveFeedSource + Send + Sync + 'static,
    {
        let history = {
            let source = Arc::clone(source);
            let session = route.session.clone();
            self.read(
                &self.caches.position_history,
                route.history_key(),
                self.config.ttls.position_history,
                deadline,
                move || async move { source.position_history(&session).await },
            )
        };
        tokio::join!(
            read_feed!(self, source, route, deadline, laps, FeedCategory::Timing, laps),
            history,
        )
    }

    /// Feed new messages into the sequence log and return the newest window.
    /// Pinned sessions get a throwaway log so they never disturb the
    /// numbering pollers rely on.
    fn race_control_window(&self, route: &Route, raw: &[RawRaceControl]) -> Vec<RaceControlMessage> {
        let window = self.config.race_control_window;
        if route.pinned {
            let mut log = RaceControlLog::new();
            log.ingest(route.session.key, raw, &self.translator);
            return log.latest(window);
        }

        let (messages, replaced) = {
            let mut logs = self.logs.lock();
            let log = logs.get_mut(route.origin);
            let replaced = log.ingest(route.session.key, raw, &self.translator);
            (log.latest(window), replaced)
        };
        if let Some(previous) = replaced {
            self.caches.evict(&session_prefix(route.origin, previous));
        }
        messages
    }

    /// Cached read bounded by `deadline`. Past the deadline the fetch keeps
    /// running for the next caller and whatever is cached is used now.
    async fn read<V, F, Fut>(
        &self,
        cache: &TtlCache<V>,
        key: String,
        ttl: Duration,
        deadline: Instant,
        fetch: F,
    ) -> Section<V>
    where
        V: PartialEq + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = FeedResult<V>> + Send + 'static,
    {
        match tokio::time::timeout_at(deadline, cache.get_or_fetch(&key, ttl, fetch)).await {
            Ok(Ok(lookup)) => match lookup.error {
                None => Section::Ready(lookup.value),
                Some(error) => Section::Degraded(lookup.value, error),
            },
            Ok(Err(error)) => Section::Missing(error),
            Err(_) => {
                let error = FetchError::Timeout {
                    after_ms: self.config.snapshot_deadline.as_millis() as u64,
                };
                tracing::debug!(key = %key, "Snapshot deadline reached");
                match cache.peek(&key) {
                    Some(lookup) => Section::Degraded(lookup.value, error),
                    None => Section::Missing(error),
                }
            }
        }
    }
}

/// Timestamp of the newest position record, the feed-progress marker
fn progress_marker(positions: &[CarPosition]) -> Option<DateTime<Utc>> {
    positions.iter().map(|p| p.at).max()
}
