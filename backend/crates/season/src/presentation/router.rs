//! Season Router

use crate::application::season_service::SeasonService;
use crate::domain::repository::SeasonSource;
use crate::presentation::handlers::{self, SeasonAppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Create the season router for any source
pub fn season_router<S>(service: Arc<SeasonService<S>>) -> Router
where
    S: SeasonSource + Send + Sync + 'static,
{
    let state = SeasonAppState { service };

    Router::new()
        .route("/schedule", get(handlers::get_schedule::<S>))
        .route("/next-race", get(handlers::get_next_race::<S>))
        .route("/standings/drivers", get(handlers::get_driver_standings::<S>))
        .route(
            "/standings/constructors",
            get(handlers::get_constructor_standings::<S>),
        )
        .route("/results/last", get(handlers::get_last_results::<S>))
        .route("/results/{round}", get(handlers::get_race_results::<S>))
        .route("/qualifying/{round}", get(handlers::get_qualifying_results::<S>))
        .route("/drivers/{number}/profile", get(handlers::get_driver_profile::<S>))
        .with_state(state)
}
