//! Orchestrator and HTTP tests for the live crate
//!
//! A fake feed source stands in for the provider; individual feeds can be
//! switched to failing or hanging, position timestamps can be frozen, and
//! every call is counted.

use crate::application::config::LiveConfig;
use crate::application::live_service::LiveService;
use crate::domain::entity::{
    CarPosition, FeedCategory, IntervalRecord, LapRecord, PitStop, RadioMessage, RawRaceControl,
    Session, SessionKind, SessionStatus, SnapshotMode, TyreStint, WeatherSample, validate_stints,
};
use crate::domain::repository::{FeedResult, LiveFeedSource};
use crate::domain::value_object::{CarNumber, LapTime, TyreCompound};
use crate::error::LiveError;
use crate::infra::demo::DemoFeed;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use kernel::id::SessionKey;
use parking_lot::Mutex;
use platform::FetchError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct FakeState {
    session: Mutex<Option<Session>>,
    race_control: Mutex<Vec<RawRaceControl>>,
    laps: Mutex<Vec<LapRecord>>,
    history: Mutex<Vec<CarPosition>>,
    failing: Mutex<HashSet<FeedCategory>>,
    hanging: Mutex<HashSet<FeedCategory>>,
    /// Position timestamp pinned to this instant instead of following the clock
    frozen_at: Mutex<Option<DateTime<Utc>>>,
    calls: Mutex<HashMap<FeedCategory, u32>>,
}

#[derive(Clone, Default)]
struct FakeSource(Arc<FakeState>);

impl FakeSource {
    fn with_session(key: u32) -> Self {
        let fake = Self::default();
        fake.set_session(Some(live_session(key)));
        fake
    }

    fn set_session(&self, session: Option<Session>) {
        *self.0.session.lock() = session;
    }

    fn fail(&self, category: FeedCategory) {
        self.0.failing.lock().insert(category);
    }

    /// Lap `number` of `car`, started `minute` minutes into the race
    fn push_lap(&self, car_number: u32, number: u32, millis: Option<u32>, minute: i64) {
        self.0.laps.lock().push(LapRecord {
            car: car(car_number),
            lap_number: number,
            started_at: Some(race_start() + ChronoDuration::minutes(minute)),
            lap_time: millis.map(LapTime::from_millis),
            sectors: [None; 3],
            is_pit_out_lap: false,
        });
    }

    fn push_position(&self, car_number: u32, position: u8, minute: i64) {
        self.0.history.lock().push(CarPosition {
            car: car(car_number),
            position,
            at: race_start() + ChronoDuration::minutes(minute),
        });
    }

    fn hang(&self, category: FeedCategory) {
        self.0.hanging.lock().insert(category);
    }

    fn freeze_positions(&self) {
        *self.0.frozen_at.lock() = Some(Utc::now());
    }

    fn calls(&self, category: FeedCategory) -> u32 {
        self.0.calls.lock().get(&category).copied().unwrap_or(0)
    }

    fn push_race_control(&self, second: u32, message: &str) {
        self.0.race_control.lock().push(RawRaceControl {
            at: Utc.with_ymd_and_hms(2024, 9, 1, 13, 0, second).unwrap(),
            category_hint: None,
            flag: None,
            scope: None,
            car: None,
            lap: None,
            message: message.to_string(),
        });
    }

    async fn hit(&self, category: FeedCategory) -> FeedResult<()> {
        let hangs = self.0.hanging.lock().contains(&category);
        if hangs {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        *self.0.calls.lock().entry(category).or_default() += 1;
        if self.0.failing.lock().contains(&category) {
            return Err(FetchError::HttpStatus { status: 503 });
        }
        Ok(())
    }
}

fn car(n: u32) -> CarNumber {
    CarNumber::new(n).unwrap()
}

const GRID: [u32; 3] = [1, 44, 16];

fn race_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 13, 0, 0).unwrap()
}

fn live_session(key: u32) -> Session {
    let now = Utc::now();
    Session {
        key: SessionKey::new(key),
        meeting_key: None,
        name: "Race".to_string(),
        kind: SessionKind::Race,
        circuit: "Monza".to_string(),
        country: "Italy".to_string(),
        year: Some(2024),
        starts_at: now - ChronoDuration::hours(1),
        ends_at: Some(now + ChronoDuration::hours(1)),
        status: SessionStatus::Active,
    }
}

impl LiveFeedSource for FakeSource {
    async fn latest_session(&self) -> FeedResult<Option<Session>> {
        self.hit(FeedCategory::Session).await?;
        Ok(self.0.session.lock().clone())
    }

    async fn session(&self, key: SessionKey) -> FeedResult<Option<Session>> {
        self.hit(FeedCategory::Session).await?;
        Ok(self.0.session.lock().clone().filter(|s| s.key == key))
    }

    async fn positions(&self, _session: &Session) -> FeedResult<Vec<CarPosition>> {
        self.hit(FeedCategory::Positions).await?;
        // Fresh timestamps keep the session from going stale.
        let frozen = *self.0.frozen_at.lock();
        let at = frozen.unwrap_or_else(Utc::now);
        Ok(GRID
            .iter()
            .enumerate()
            .map(|(i, &n)| CarPosition {
                car: car(n),
                position: i as u8 + 1,
                at,
            })
            .collect())
    }

    async fn position_history(&self, _session: &Session) -> FeedResult<Vec<CarPosition>> {
        self.hit(FeedCategory::Positions).await?;
        Ok(self.0.history.lock().clone())
    }

    async fn laps(&self, _session: &Session) -> FeedResult<Vec<LapRecord>> {
        self.hit(FeedCategory::Timing).await?;
        Ok(self.0.laps.lock().clone())
    }

    async fn intervals(&self, _session: &Session) -> FeedResult<Vec<IntervalRecord>> {
        self.hit(FeedCategory::Intervals).await?;
        Ok(Vec::new())
    }

    async fn stints(&self, _session: &Session) -> FeedResult<Vec<TyreStint>> {
        self.hit(FeedCategory::Tyres).await?;
        Ok(GRID
            .iter()
            .map(|&n| TyreStint {
                car: car(n),
                stint_number: 1,
                compound: TyreCompound::Medium,
                lap_start: 1,
                lap_end: None,
                tyre_age_at_start: 2,
            })
            .collect())
    }

    async fn pit_stops(&self, _session: &Session) -> FeedResult<Vec<PitStop>> {
        self.hit(FeedCategory::PitStops).await?;
        Ok(Vec::new())
    }

    async fn radio(&self, _session: &Session) -> FeedResult<Vec<RadioMessage>> {
        self.hit(FeedCategory::Radio).await?;
        Ok(Vec::new())
    }

    async fn weather(&self, _session: &Session) -> FeedResult<Vec<WeatherSample>> {
        self.hit(FeedCategory::Weather).await?;
        Ok(Vec::new())
    }

    async fn race_control(&self, _session: &Session) -> FeedResult<Vec<RawRaceControl>> {
        self.hit(FeedCategory::RaceControl).await?;
        Ok(self.0.race_control.lock().clone())
    }
}

fn service(fake: &FakeSource) -> LiveService<FakeSource> {
    let config = LiveConfig::default();
    LiveService::new(fake.clone(), DemoFeed::new(&config), config)
}

/// Demo feed on a clock the test moves by hand, starting five minutes into
/// the first demo race.
fn manual_demo(config: &LiveConfig) -> (DemoFeed, Arc<Mutex<DateTime<Utc>>>) {
    let now = Arc::new(Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap()));
    let clock = Arc::clone(&now);
    let demo = DemoFeed::new(config).with_clock(Arc::new(move || *clock.lock()));
    (demo, now)
}

mod snapshot_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_live_snapshot_all_sections() {
        let fake = FakeSource::with_session(9158);
        let service = service(&fake);

        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(snapshot.mode, SnapshotMode::Live);
        assert!(snapshot.degraded.is_empty());
        assert_eq!(snapshot.session.key, SessionKey::new(9158));
        let cars: Vec<u32> = snapshot.drivers.iter().map(|d| d.car.get()).collect();
        assert_eq!(cars, GRID);
        assert_eq!(snapshot.drivers[1].code, "HAM");
        assert!(snapshot.drivers.iter().all(|d| d.tyre.is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tyre_failure_degrades_and_keeps_last_value() {
        let fake = FakeSource::with_session(9158);
        let service = service(&fake);

        let first = service.get_live_snapshot(None).await.unwrap();
        let first_tyres: Vec<_> = first.drivers.iter().map(|d| d.tyre).collect();

        fake.fail(FeedCategory::Tyres);
        // Past ttl (10s) and grace (20s), so the read waits for the refresh.
        tokio::time::advance(Duration::from_secs(31)).await;

        let second = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(second.mode, SnapshotMode::Degraded);
        assert_eq!(second.degraded, vec![FeedCategory::Tyres]);
        assert_eq!(second.drivers.len(), GRID.len());
        let second_tyres: Vec<_> = second.drivers.iter().map(|d| d.tyre).collect();
        assert_eq!(second_tyres, first_tyres);
        assert_eq!(fake.calls(FeedCategory::Positions), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_refresh_within_grace_degrades() {
        let fake = FakeSource::with_session(9158);
        let service = service(&fake);

        let first = service.get_live_snapshot(None).await.unwrap();
        let first_tyres: Vec<_> = first.drivers.iter().map(|d| d.tyre).collect();
        fake.fail(FeedCategory::Tyres);

        // Past ttl, inside grace: this read starts the failing refresh.
        tokio::time::advance(Duration::from_secs(12)).await;
        service.get_live_snapshot(None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        tokio::time::advance(Duration::from_secs(3)).await;
        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(snapshot.mode, SnapshotMode::Degraded);
        assert_eq!(snapshot.degraded, vec![FeedCategory::Tyres]);
        let tyres: Vec<_> = snapshot.drivers.iter().map(|d| d.tyre).collect();
        assert_eq!(tyres, first_tyres);
        assert!(fake.calls(FeedCategory::Tyres) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_category_served_from_cache_at_deadline() {
        let fake = FakeSource::with_session(9158);
        let service = service(&fake);

        let first = service.get_live_snapshot(None).await.unwrap();
        let first_tyres: Vec<_> = first.drivers.iter().map(|d| d.tyre).collect();

        // Past ttl and grace, so the read would wait on the hung refresh.
        tokio::time::advance(Duration::from_secs(31)).await;
        fake.hang(FeedCategory::Tyres);

        let started = tokio::time::Instant::now();
        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert!(started.elapsed() <= service.config().snapshot_deadline);
        assert_eq!(snapshot.mode, SnapshotMode::Degraded);
        assert_eq!(snapshot.degraded, vec![FeedCategory::Tyres]);
        let tyres: Vec<_> = snapshot.drivers.iter().map(|d| d.tyre).collect();
        assert_eq!(tyres, first_tyres);
        assert!(tyres.iter().all(Option::is_some));
    }

    #[tokio::test(start_paused = true)]
    async fn test_optional_feed_failure_without_cache_leaves_section_empty() {
        let fake = FakeSource::with_session(9158);
        fake.fail(FeedCategory::Tyres);
        let service = service(&fake);

        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(snapshot.mode, SnapshotMode::Degraded);
        assert!(snapshot.drivers.iter().all(|d| d.tyre.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_positions_failure_without_cache_is_an_error() {
        let fake = FakeSource::with_session(9158);
        fake.fail(FeedCategory::Positions);
        let service = service(&fake);

        let err = service.get_live_snapshot(None).await.unwrap_err();
        assert!(matches!(
            err,
            LiveError::CategoryUnavailable {
                category: FeedCategory::Positions,
                ..
            }
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_snapshots_fetch_once() {
        let fake = FakeSource::with_session(9158);
        let service = service(&fake);

        let (a, b) = tokio::join!(
            service.get_live_snapshot(None),
            service.get_live_snapshot(None)
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(fake.calls(FeedCategory::Positions), 1);
        assert_eq!(fake.calls(FeedCategory::Tyres), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hint_for_unknown_session() {
        let fake = FakeSource::with_session(9158);
        let service = service(&fake);

        let err = service
            .get_live_snapshot(Some(SessionKey::new(1234)))
            .await
            .unwrap_err();
        assert!(matches!(err, LiveError::SessionNotFound(1234)));

        let snapshot = service
            .get_live_snapshot(Some(SessionKey::new(9158)))
            .await
            .unwrap();
        assert_eq!(snapshot.session.key, SessionKey::new(9158));
    }
}

mod demo_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_no_session_serves_valid_demo() {
        let fake = FakeSource::default();
        let config = LiveConfig::default();
        let (demo, _) = manual_demo(&config);
        let service = LiveService::new(fake.clone(), demo, config);

        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(snapshot.mode, SnapshotMode::Demo);
        assert!(DemoFeed::is_demo_key(snapshot.session.key));
        assert_eq!(snapshot.drivers.len(), 20);

        let mut positions: Vec<u8> = snapshot.drivers.iter().map(|d| d.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, (1..=20).collect::<Vec<u8>>());
        assert!(snapshot.weather.is_some());
        assert!(snapshot.race_control.windows(2).all(|w| w[0].seq < w[1].seq));
        // Live feeds are never asked for data without a session.
        assert_eq!(fake.calls(FeedCategory::Positions), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_laps_progress_monotonically() {
        let fake = FakeSource::default();
        let config = LiveConfig::default();
        let (demo, clock) = manual_demo(&config);
        let service = LiveService::new(fake, demo, config);

        let mut previous: HashMap<CarNumber, u32> = HashMap::new();
        for _ in 0..6 {
            let snapshot = service.get_live_snapshot(None).await.unwrap();
            for driver in &snapshot.drivers {
                let lap = driver.lap_number.unwrap_or(0);
                let before = previous.insert(driver.car, lap).unwrap_or(0);
                assert!(lap >= before, "car {} went from lap {before} to {lap}", driver.car);
            }
            *clock.lock() += ChronoDuration::seconds(11);
            tokio::time::advance(Duration::from_secs(11)).await;
        }
        let leader_lap = previous.values().copied().max().unwrap_or(0);
        assert!(leader_lap > 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_tyres_valid() {
        let fake = FakeSource::default();
        let config = LiveConfig::default();
        let (demo, _) = manual_demo(&config);
        let service = LiveService::new(fake, demo, config);

        let tyres = service.get_driver_tyres(1).await.unwrap();
        assert!(!tyres.stints.is_empty());
        assert!(validate_stints(&tyres.stints).is_ok());
        assert!(tyres.stints.last().is_some_and(|s| s.is_open()));
    }
}

mod tyre_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_driver_tyres_from_live_feed() {
        let fake = FakeSource::with_session(9158);
        let service = service(&fake);

        let tyres = service.get_driver_tyres(44).await.unwrap();
        assert_eq!(tyres.session_key, SessionKey::new(9158));
        assert_eq!(tyres.stints.len(), 1);
        assert_eq!(tyres.stints[0].car, car(44));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_driver() {
        let fake = FakeSource::with_session(9158);
        let service = service(&fake);

        assert!(matches!(
            service.get_driver_tyres(0).await,
            Err(LiveError::UnknownDriver(0))
        ));
        // Valid number, not on the roster and not in the session
        assert!(matches!(
            service.get_driver_tyres(98).await,
            Err(LiveError::UnknownDriver(98))
        ));
    }
}

mod race_control_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_since_returns_only_new_messages() {
        let fake = FakeSource::with_session(9158);
        fake.push_race_control(1, "GREEN LIGHT - PIT EXIT OPEN");
        fake.push_race_control(2, "DRS ENABLED");
        let service = service(&fake);

        let feed = service.get_race_control_since(0).await.unwrap();
        assert_eq!(feed.messages.len(), 2);
        assert!(feed.messages.windows(2).all(|w| w[0].seq < w[1].seq));
        assert_eq!(feed.messages[1].normalized, "DRS enabled");

        let again = service.get_race_control_since(feed.last_seq).await.unwrap();
        assert!(again.messages.is_empty());

        fake.push_race_control(3, "SAFETY CAR DEPLOYED");
        // Within the grace window the old poll result would still be served.
        tokio::time::advance(Duration::from_secs(31)).await;
        let update = service.get_race_control_since(feed.last_seq).await.unwrap();
        assert_eq!(update.messages.len(), 1);
        assert!(update.messages[0].seq > feed.last_seq);
        assert_eq!(fake.calls(FeedCategory::RaceControl), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_and_poll_share_numbering() {
        let fake = FakeSource::with_session(9158);
        fake.push_race_control(1, "DRS ENABLED");
        let service = service(&fake);

        let snapshot = service.get_live_snapshot(None).await.unwrap();
        let feed = service.get_race_control_since(0).await.unwrap();
        assert_eq!(snapshot.race_control, feed.messages);
    }
}

mod session_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_session_change_evicts_old_entries() {
        let fake = FakeSource::with_session(1);
        let service = service(&fake);
        service.get_live_snapshot(None).await.unwrap();
        let before = service.health().cache.total_keys;

        fake.set_session(Some(live_session(2)));
        // Past the session lookup's ttl and grace
        tokio::time::advance(Duration::from_secs(51)).await;
        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(snapshot.session.key, SessionKey::new(2));

        let health = service.health();
        assert_eq!(health.phase, "live");
        assert_eq!(health.session_key, Some(SessionKey::new(2)));
        // Old session's feed entries are gone, the new one's replaced them
        assert_eq!(health.cache.total_keys, before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frozen_feed_falls_back_to_demo() {
        let fake = FakeSource::with_session(1);
        fake.freeze_positions();
        let service = service(&fake);
        assert_eq!(
            service.get_live_snapshot(None).await.unwrap().mode,
            SnapshotMode::Live
        );

        // Past the 60s staleness threshold with the same position timestamp
        tokio::time::advance(Duration::from_secs(61)).await;
        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(snapshot.mode, SnapshotMode::Demo);
        assert!(DemoFeed::is_demo_key(snapshot.session.key));
        assert_eq!(service.health().phase, "stale");
        // The live feed was still asked, fresh positions would have revived it.
        assert_eq!(fake.calls(FeedCategory::Positions), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_frozen_session_stays_on_demo() {
        let fake = FakeSource::with_session(1);
        fake.freeze_positions();
        let service = service(&fake);
        assert_eq!(
            service.get_live_snapshot(None).await.unwrap().mode,
            SnapshotMode::Live
        );

        let steps = [(61, "stale"), (120, "stale"), (841, "no_session"), (1, "stale"), (5, "stale")];
        for (secs, phase) in steps {
            tokio::time::advance(Duration::from_secs(secs)).await;
            let snapshot = service.get_live_snapshot(None).await.unwrap();
            assert_eq!(snapshot.mode, SnapshotMode::Demo, "after +{secs}s");
            assert_eq!(service.health().phase, phase, "after +{secs}s");
        }

        // Positions moving again bring the session back.
        *fake.0.frozen_at.lock() = None;
        tokio::time::advance(Duration::from_secs(31)).await;
        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(snapshot.mode, SnapshotMode::Live);
        assert_eq!(service.health().phase, "live");
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_end_falls_back_to_demo() {
        let fake = FakeSource::with_session(1);
        let service = service(&fake);
        assert_eq!(
            service.get_live_snapshot(None).await.unwrap().mode,
            SnapshotMode::Live
        );

        fake.set_session(None);
        tokio::time::advance(Duration::from_secs(51)).await;
        let snapshot = service.get_live_snapshot(None).await.unwrap();
        assert_eq!(snapshot.mode, SnapshotMode::Demo);
        assert_eq!(service.health().phase, "no_session");
    }
}

mod analytics_tests {
    use super::*;
    use crate::application::live_service::FeedOrigin;

    fn race_fake() -> FakeSource {
        let fake = FakeSource::with_session(9158);
        fake.push_lap(1, 1, Some(86_000), 0);
        fake.push_lap(1, 2, Some(84_200), 2);
        fake.push_lap(44, 1, Some(86_400), 0);
        fake.push_lap(44, 2, Some(84_900), 2);
        fake.push_position(1, 2, 0);
        fake.push_position(44, 1, 0);
        fake.push_position(1, 1, 1);
        fake.push_position(44, 2, 1);
        fake
    }

    #[tokio::test(start_paused = true)]
    async fn test_lap_times_for_live_session() {
        let fake = race_fake();
        let service = service(&fake);

        let chart = service.get_lap_times(None, None).await.unwrap();
        assert_eq!(chart.session_key, SessionKey::new(9158));
        assert_eq!(chart.origin, FeedOrigin::Live);
        assert_eq!(chart.chart.total_laps, 2);
        assert_eq!(chart.chart.session_best, Some(LapTime::from_millis(84_200)));
        assert_eq!(chart.chart.drivers.len(), 2);
        assert!(
            chart.chart.drivers[0]
                .laps
                .iter()
                .all(|l| l.compound == TyreCompound::Medium)
        );

        let only = service.get_lap_times(None, Some(vec![44])).await.unwrap();
        assert_eq!(only.chart.drivers.len(), 1);
        assert_eq!(only.chart.session_best, Some(LapTime::from_millis(84_900)));
        // Both reads hit the same cached feeds.
        assert_eq!(fake.calls(FeedCategory::Timing), 1);

        assert!(matches!(
            service.get_lap_times(None, Some(vec![0])).await,
            Err(LiveError::InvalidRequest(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lap_times_without_timing_is_an_error() {
        let fake = race_fake();
        fake.fail(FeedCategory::Timing);
        let service = service(&fake);

        let err = service.get_lap_times(None, None).await.unwrap_err();
        assert!(matches!(
            err,
            LiveError::CategoryUnavailable {
                category: FeedCategory::Timing,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_chart_for_live_session() {
        let fake = race_fake();
        let service = service(&fake);

        let chart = service.get_position_chart(None).await.unwrap();
        assert_eq!(chart.origin, FeedOrigin::Live);
        let by_car: Vec<(u32, Vec<u8>)> = chart
            .chart
            .drivers
            .iter()
            .map(|d| (d.car.get(), d.positions.iter().map(|p| p.position).collect()))
            .collect();
        assert_eq!(by_car, vec![(1, vec![2, 1]), (44, vec![1, 2])]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_charts_without_session_use_demo() {
        let fake = FakeSource::default();
        let config = LiveConfig::default();
        let (demo, _) = manual_demo(&config);
        let service = LiveService::new(fake.clone(), demo, config);

        let laps = service.get_lap_times(None, None).await.unwrap();
        assert_eq!(laps.origin, FeedOrigin::Demo);
        assert_eq!(laps.chart.drivers.len(), 20);
        assert!(laps.chart.total_laps >= 1);

        let positions = service.get_position_chart(None).await.unwrap();
        assert_eq!(positions.chart.drivers.len(), 20);
        assert_eq!(fake.calls(FeedCategory::Timing), 0);
    }
}

mod router_tests {
    use super::*;
    use crate::presentation::router::live_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_route() {
        let fake = FakeSource::with_session(9158);
        let router = live_router(Arc::new(service(&fake)));

        let (status, body) = get(router.clone(), "/snapshot").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "live");
        assert_eq!(body["session"]["key"], 9158);
        assert_eq!(body["drivers"][0]["teamColour"].as_str().map(|s| s.starts_with('#')), Some(true));

        let (status, body) = get(router, "/snapshot?session=4242").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tyres_and_race_control_routes() {
        let fake = FakeSource::with_session(9158);
        fake.push_race_control(1, "DRS ENABLED");
        let router = live_router(Arc::new(service(&fake)));

        let (status, body) = get(router.clone(), "/drivers/16/tyres").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stints"][0]["compound"], "MEDIUM");

        let (status, _) = get(router.clone(), "/drivers/0/tyres").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(router, "/race-control?since=0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"][0]["seq"], 1);
        assert_eq!(body["lastSeq"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chart_routes() {
        let fake = FakeSource::with_session(9158);
        fake.push_lap(1, 1, Some(86_000), 0);
        fake.push_lap(44, 1, Some(85_500), 0);
        fake.push_position(1, 1, 0);
        fake.push_position(44, 2, 0);
        let router = live_router(Arc::new(service(&fake)));

        let (status, body) = get(router.clone(), "/laptimes?drivers=1,44").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sessionKey"], 9158);
        assert_eq!(body["drivers"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["totalLaps"], 1);

        let (status, body) = get(router.clone(), "/laptimes?drivers=1,abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (status, body) = get(router, "/position-chart").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["origin"], "live");
        assert_eq!(body["drivers"][1]["positions"][0]["position"], 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_snapshot_serves_last_known_good() {
        let fake = FakeSource::with_session(1);
        let router = live_router(Arc::new(service(&fake)));
        let (status, _) = get(router.clone(), "/snapshot").await;
        assert_eq!(status, StatusCode::OK);

        // New session whose positions never arrive
        fake.set_session(Some(live_session(2)));
        fake.fail(FeedCategory::Positions);
        tokio::time::advance(Duration::from_secs(51)).await;

        let (status, body) = get(router, "/snapshot").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "degraded");
        assert_eq!(body["session"]["key"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_snapshot_without_fallback_is_problem_json() {
        let fake = FakeSource::with_session(1);
        fake.fail(FeedCategory::Positions);
        let router = live_router(Arc::new(service(&fake)));

        let (status, body) = get(router, "/snapshot").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["status"], 502);
        assert!(body["action"].is_string());
    }
}
