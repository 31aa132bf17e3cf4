//! Domain Layer - Live session model
//!
//! This layer contains:
//! - Domain entities (Session, per-feed records, LiveSnapshot)
//! - Value objects (CarNumber, LapTime, TyreCompound)
//! - Domain services (race-control translator, timing summary, driver merge)
//! - The feed source trait implemented by the live and demo adapters

pub mod entity;
pub mod repository;
pub mod roster;
pub mod services;
pub mod value_object;
