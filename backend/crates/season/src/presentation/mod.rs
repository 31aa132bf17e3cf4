//! Presentation Layer
//!
//! HTTP handlers for the season read API.

pub mod handlers;
pub mod router;
