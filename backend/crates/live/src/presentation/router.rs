//! Live Router

use crate::application::live_service::LiveService;
use crate::domain::repository::LiveFeedSource;
use crate::presentation::handlers::{self, LiveAppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Create the live router for any feed source
pub fn live_router<S>(service: Arc<LiveService<S>>) -> Router
where
    S: LiveFeedSource + Send + Sync + 'static,
{
    let state = LiveAppState::new(service);

    Router::new()
        .route("/snapshot", get(handlers::get_snapshot::<S>))
        .route("/drivers/{car}/tyres", get(handlers::get_driver_tyres::<S>))
        .route("/race-control", get(handlers::get_race_control::<S>))
        .route("/laptimes", get(handlers::get_lap_times::<S>))
        .route("/position-chart", get(handlers::get_position_chart::<S>))
        .with_state(state)
}
