//! HTTP Handlers

use crate::application::season_service::SeasonService;
use crate::domain::entity::{
    ConstructorStanding, DriverProfile, DriverStanding, QualifyingResults, Race, RaceResults, Round, Schedule,
    Standings,
};
use crate::domain::repository::SeasonSource;
use crate::error::SeasonResult;
use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for season handlers
pub struct SeasonAppState<S> {
    pub service: Arc<SeasonService<S>>,
}

impl<S> Clone for SeasonAppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Response for GET /api/season/next-race
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRaceResponse {
    /// `None` after the final round
    pub race: Option<Race>,
}

/// GET /api/season/schedule
pub async fn get_schedule<S>(State(state): State<SeasonAppState<S>>) -> SeasonResult<Json<Schedule>>
where
    S: SeasonSource + Send + Sync + 'static,
{
    Ok(Json(state.service.get_schedule().await?))
}

/// GET /api/season/next-race
pub async fn get_next_race<S>(
    State(state): State<SeasonAppState<S>>,
) -> SeasonResult<Json<NextRaceResponse>>
where
    S: SeasonSource + Send + Sync + 'static,
{
    let race = state.service.get_next_race().await?;
    Ok(Json(NextRaceResponse { race }))
}

/// GET /api/season/standings/drivers
pub async fn get_driver_standings<S>(
    State(state): State<SeasonAppState<S>>,
) -> SeasonResult<Json<Standings<DriverStanding>>>
where
    S: SeasonSource + Send + Sync + 'static,
{
    Ok(Json(state.service.get_driver_standings().await?))
}

/// GET /api/season/standings/constructors
pub async fn get_constructor_standings<S>(
    State(state): State<SeasonAppState<S>>,
) -> SeasonResult<Json<Standings<ConstructorStanding>>>
where
    S: SeasonSource + Send + Sync + 'static,
{
    Ok(Json(state.service.get_constructor_standings().await?))
}

/// GET /api/season/results/last
pub async fn get_last_results<S>(State(state): State<SeasonAppState<S>>) -> SeasonResult<Json<RaceResults>>
where
    S: SeasonSource + Send + Sync + 'static,
{
    Ok(Json(state.service.get_race_results(Round::Last).await?))
}

/// GET /api/season/results/{round}
pub async fn get_race_results<S>(
    State(state): State<SeasonAppState<S>>,
    Path(round): Path<u32>,
) -> SeasonResult<Json<RaceResults>>
where
    S: SeasonSource + Send + Sync + 'static,
{
    Ok(Json(state.service.get_race_results(Round::Number(round)).await?))
}

/// GET /api/season/qualifying/{round}
pub async fn get_qualifying_results<S>(
    State(state): State<SeasonAppState<S>>,
    Path(round): Path<u32>,
) -> SeasonResult<Json<QualifyingResults>>
where
    S: SeasonSource + Send + Sync + 'static,
{
    Ok(Json(state.service.get_qualifying_results(round).await?))
}

/// GET /api/season/drivers/{number}/profile
pub async fn get_driver_profile<S>(
    State(state): State<SeasonAppState<S>>,
    Path(number): Path<u32>,
) -> SeasonResult<Json<DriverProfile>>
where
    S: SeasonSource + Send + Sync + 'static,
{
    Ok(Json(state.service.get_driver_profile(number).await?))
}
