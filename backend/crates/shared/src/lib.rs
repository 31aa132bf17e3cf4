//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types and result aliases
//! - Typed upstream keys (session, meeting, round)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across the live and season domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
