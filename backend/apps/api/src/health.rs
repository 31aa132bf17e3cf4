//! Health endpoint
//!
//! Orchestrator phase, translator misses and cache counters of both domains.

use axum::{Json, Router, extract::State, routing::get};
use live::LiveService;
use live::application::live_service::LiveHealth;
use live::domain::repository::LiveFeedSource;
use platform::CacheStats;
use season::SeasonService;
use season::domain::repository::SeasonSource;
use serde::Serialize;
use std::sync::Arc;

pub struct HealthState<L, S> {
    pub live: Arc<LiveService<L>>,
    pub season: Arc<SeasonService<S>>,
}

impl<L, S> Clone for HealthState<L, S> {
    fn clone(&self) -> Self {
        Self {
            live: Arc::clone(&self.live),
            season: Arc::clone(&self.season),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub live: LiveHealth,
    pub season_cache: CacheStats,
}

async fn get_health<L, S>(State(state): State<HealthState<L, S>>) -> Json<HealthResponse>
where
    L: LiveFeedSource + Send + Sync + 'static,
    S: SeasonSource + Send + Sync + 'static,
{
    Json(HealthResponse {
        status: "ok",
        live: state.live.health(),
        season_cache: state.season.cache_stats(),
    })
}

pub fn health_router<L, S>(live: Arc<LiveService<L>>, season: Arc<SeasonService<S>>) -> Router
where
    L: LiveFeedSource + Send + Sync + 'static,
    S: SeasonSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(get_health::<L, S>))
        .with_state(HealthState { live, season })
}
