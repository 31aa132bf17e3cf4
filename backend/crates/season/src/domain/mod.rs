//! Domain Layer

pub mod entity;
pub mod repository;
pub mod results;
pub mod schedule;
pub mod standings;
pub mod team;
