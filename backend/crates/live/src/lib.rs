//! Live Session Aggregation
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, race-control translator, feed source trait
//! - `application/` - Session orchestration and the read API
//! - `infra/` - OpenF1 adapter with per-feed normalizers, synthetic demo feed
//! - `presentation/` - HTTP handlers
//!
//! ## Data flow
//! - Every read goes through a per-category TTL cache; at most one upstream
//!   fetch per key is in flight
//! - Upstream failures degrade the snapshot instead of failing it; only a
//!   positions feed with nothing cached is fatal
//! - With no live session (or a frozen one) the demo feed answers through the
//!   same source interface

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::LiveConfig;
pub use application::live_service::LiveService;
pub use error::{LiveError, LiveResult};
pub use infra::demo::DemoFeed;
pub use infra::openf1::OpenF1Source;
pub use presentation::router::live_router;

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
