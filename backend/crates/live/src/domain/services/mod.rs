//! Domain Services
//!
//! Pure logic shared by the live and demo paths.

pub mod analytics;
pub mod merge;
pub mod race_control;
pub mod timing;

pub use analytics::{LapTimeChart, PositionChart, lap_time_chart, position_chart};
pub use merge::{DriverFeeds, build_drivers, current_tyre};
pub use race_control::{RaceControlTranslator, Translation, translate};
pub use timing::summarize_laps;
