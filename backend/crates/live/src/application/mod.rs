//! Application Layer
//!
//! Session orchestration and the read use cases.

pub mod config;
pub mod live_service;
pub mod race_control_log;
pub mod session_tracker;
