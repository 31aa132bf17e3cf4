//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod health;

use axum::{
    Router, http,
    http::{Method, header},
};
use live::{DemoFeed, LiveConfig, LiveService, OpenF1Source, live_router};
use platform::{UpstreamClient, UpstreamConfig};
use season::{JolpicaSource, SeasonConfig, SeasonService, season_router};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,live=info,season=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // One client, so both providers share the concurrency ceiling
    let upstream_config = UpstreamConfig::from_env();
    let client = UpstreamClient::new(&upstream_config)?;
    tracing::info!(
        max_concurrency = upstream_config.max_concurrency,
        timeout_ms = upstream_config.request_timeout.as_millis() as u64,
        "Upstream client ready"
    );

    let live_config = LiveConfig::from_env();
    let live_service = Arc::new(LiveService::new(
        OpenF1Source::new(client.clone(), &live_config),
        DemoFeed::new(&live_config),
        live_config.clone(),
    ));
    tracing::info!(api_base = %live_config.api_base, "Live service configured");

    let season_config = SeasonConfig::from_env();
    let season_service = Arc::new(SeasonService::new(
        JolpicaSource::new(client, &season_config),
        season_config.clone(),
    ));
    tracing::info!(
        api_base = %season_config.api_base,
        season = %season_config.season,
        "Season service configured"
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([Method::GET, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]));

    // Build router
    let app = Router::new()
        .nest(
            "/api/health",
            health::health_router(Arc::clone(&live_service), Arc::clone(&season_service)),
        )
        .nest("/api/live", live_router(live_service))
        .nest("/api/season", season_router(season_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("API_BIND_ADDR")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 31113)));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
