//! Environment configuration helpers
//!
//! Every setting has a default; a value that fails to parse is logged and
//! replaced by the default rather than aborting startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Read `key` from the environment, falling back to `default`.
pub fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Unparsable config value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_secs(key: &str, default: Duration) -> Duration {
    Duration::from_secs(env_or(key, default.as_secs()))
}

pub fn env_millis(key: &str, default: Duration) -> Duration {
    Duration::from_millis(env_or(key, default.as_millis() as u64))
}

/// Upstream client configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Ceiling on in-flight upstream requests across all providers
    pub max_concurrency: usize,
    /// Per-call timeout, covering connect, headers and body
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 3,
            request_timeout: Duration::from_secs(5),
            user_agent: "pitwall/0.1".to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_concurrency: env_or("UPSTREAM_MAX_CONCURRENCY", defaults.max_concurrency).max(1),
            request_timeout: env_secs("UPSTREAM_TIMEOUT_SECS", defaults.request_timeout),
            user_agent: env_string("UPSTREAM_USER_AGENT", &defaults.user_agent),
        }
    }
}
