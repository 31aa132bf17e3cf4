//! Season Statistics
//!
//! Clean Architecture structure:
//! - `domain/` - Schedule and standings entities, schedule rules, source trait
//! - `application/` - Cached read use cases
//! - `infra/` - Jolpica (Ergast mirror) adapter
//! - `presentation/` - HTTP handlers
//!
//! The provider is quota-bound, so every request goes through the shared
//! rate limiter and results are cached for minutes to hours.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SeasonConfig;
pub use application::season_service::SeasonService;
pub use error::{SeasonError, SeasonResult};
pub use infra::jolpica::JolpicaSource;
pub use presentation::router::season_router;
