//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Upstream HTTP client with a global concurrency ceiling
//! - Single-flight TTL cache with serve-stale semantics
//! - Rate limiting for quota-bound providers
//! - Environment configuration helpers

pub mod cache;
pub mod client;
pub mod config;
pub mod rate_limit;

pub use cache::{CacheStats, Freshness, Lookup, TtlCache};
pub use client::{FetchError, Provider, UpstreamClient};
pub use config::UpstreamConfig;
pub use rate_limit::{RateLimitConfig, RateLimiter};
