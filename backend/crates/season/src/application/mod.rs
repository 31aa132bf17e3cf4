//! Application Layer

pub mod config;
pub mod season_service;
