//! HTTP Handlers

use crate::application::live_service::{DriverTyres, LiveService, RaceControlFeed, SessionChart};
use crate::domain::entity::{FeedCategory, LiveSnapshot, SnapshotMode};
use crate::domain::repository::LiveFeedSource;
use crate::domain::services::{LapTimeChart, PositionChart};
use crate::error::LiveResult;
use crate::presentation::dto::{LapTimesQuery, RaceControlQuery, SnapshotQuery};
use axum::Json;
use axum::extract::{Path, Query, State};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared state for live handlers
pub struct LiveAppState<S> {
    pub service: Arc<LiveService<S>>,
    /// Last snapshot served successfully, handed out when assembly fails
    pub last_good: Arc<Mutex<Option<LiveSnapshot>>>,
}

impl<S> Clone for LiveAppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            last_good: Arc::clone(&self.last_good),
        }
    }
}

impl<S> LiveAppState<S> {
    pub fn new(service: Arc<LiveService<S>>) -> Self {
        Self {
            service,
            last_good: Arc::new(Mutex::new(None)),
        }
    }
}

/// GET /api/live/snapshot
pub async fn get_snapshot<S>(
    State(state): State<LiveAppState<S>>,
    Query(query): Query<SnapshotQuery>,
) -> LiveResult<Json<LiveSnapshot>>
where
    S: LiveFeedSource + Send + Sync + 'static,
{
    match state.service.get_live_snapshot(query.session).await {
        Ok(snapshot) => {
            if query.session.is_none() {
                *state.last_good.lock() = Some(snapshot.clone());
            }
            Ok(Json(snapshot))
        }
        Err(err) if query.session.is_none() => {
            let fallback = state.last_good.lock().clone();
            match fallback {
                Some(snapshot) => {
                    tracing::warn!(error = %err, "Snapshot failed, serving last known good");
                    Ok(Json(as_degraded(snapshot)))
                }
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

/// A previously served snapshot, re-labelled as stale in every section.
fn as_degraded(mut snapshot: LiveSnapshot) -> LiveSnapshot {
    snapshot.mode = SnapshotMode::Degraded;
    snapshot.degraded = FeedCategory::ALL
        .into_iter()
        .filter(|c| *c != FeedCategory::Session)
        .collect();
    snapshot
}

/// GET /api/live/drivers/{car}/tyres
pub async fn get_driver_tyres<S>(
    State(state): State<LiveAppState<S>>,
    Path(car): Path<u32>,
) -> LiveResult<Json<DriverTyres>>
where
    S: LiveFeedSource + Send + Sync + 'static,
{
    let tyres = state.service.get_driver_tyres(car).await?;
    Ok(Json(tyres))
}

/// GET /api/live/race-control
pub async fn get_race_control<S>(
    State(state): State<LiveAppState<S>>,
    Query(query): Query<RaceControlQuery>,
) -> LiveResult<Json<RaceControlFeed>>
where
    S: LiveFeedSource + Send + Sync + 'static,
{
    let feed = state.service.get_race_control_since(query.since).await?;
    Ok(Json(feed))
}

/// GET /api/live/laptimes
pub async fn get_lap_times<S>(
    State(state): State<LiveAppState<S>>,
    Query(query): Query<LapTimesQuery>,
) -> LiveResult<Json<SessionChart<LapTimeChart>>>
where
    S: LiveFeedSource + Send + Sync + 'static,
{
    let drivers = query.drivers()?;
    let chart = state.service.get_lap_times(query.session, drivers).await?;
    Ok(Json(chart))
}

/// GET /api/live/position-chart
pub async fn get_position_chart<S>(
    State(state): State<LiveAppState<S>>,
    Query(query): Query<SnapshotQuery>,
) -> LiveResult<Json<SessionChart<PositionChart>>>
where
    S: LiveFeedSource + Send + Sync + 'static,
{
    let chart = state.service.get_position_chart(query.session).await?;
    Ok(Json(chart))
}
