//! Rate Limiting Infrastructure
//!
//! Outbound fixed-window limiter for providers that publish a request quota
//! (for example "4 per second, 200 per hour"). All windows must have room for
//! a request to pass.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Requests left in the tightest window
    pub remaining: u32,
    /// Time until the blocking window resets (zero when allowed)
    pub retry_after: Duration,
}

#[derive(Debug)]
struct Window {
    config: RateLimitConfig,
    started_at: Instant,
    used: u32,
}

impl Window {
    fn roll(&mut self, now: Instant) {
        if now.duration_since(self.started_at) >= self.config.window {
            self.started_at = now;
            self.used = 0;
        }
    }

    fn remaining(&self) -> u32 {
        self.config.max_requests.saturating_sub(self.used)
    }

    fn resets_in(&self, now: Instant) -> Duration {
        (self.started_at + self.config.window).saturating_duration_since(now)
    }
}

/// Multi-window outbound rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<Vec<Window>>,
}

impl RateLimiter {
    pub fn new(configs: impl IntoIterator<Item = RateLimitConfig>) -> Self {
        let now = Instant::now();
        let windows = configs
            .into_iter()
            .map(|config| Window {
                config,
                started_at: now,
                used: 0,
            })
            .collect();
        Self {
            windows: Mutex::new(windows),
        }
    }

    /// Take one request slot if every window has room.
    pub fn try_acquire(&self) -> RateLimitResult {
        let now = Instant::now();
        let mut windows = self.windows.lock();

        for window in windows.iter_mut() {
            window.roll(now);
        }

        let blocked = windows
            .iter()
            .filter(|w| w.remaining() == 0)
            .map(|w| w.resets_in(now))
            .max();

        if let Some(retry_after) = blocked {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                retry_after,
            };
        }

        for window in windows.iter_mut() {
            window.used += 1;
        }

        RateLimitResult {
            allowed: true,
            remaining: windows.iter().map(Window::remaining).min().unwrap_or(u32::MAX),
            retry_after: Duration::ZERO,
        }
    }

    /// Wait until a request slot is available, then take it.
    pub async fn acquire(&self) {
        loop {
            let result = self.try_acquire();
            if result.allowed {
                return;
            }
            tracing::debug!(
                retry_after_ms = result.retry_after.as_millis() as u64,
                "Rate limit reached, waiting"
            );
            tokio::time::sleep(result.retry_after.max(Duration::from_millis(1))).await;
        }
    }
}
