use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration with millisecond precision (lap, sector, gap or pit time)
///
/// Serialized as integer milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LapTime(u32);

impl LapTime {
    #[inline]
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Upstream feeds report seconds as floats. Missing, zero, negative and
    /// non-finite values have no meaning as a duration and map to `None`.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return None;
        }
        let ms = (secs * 1000.0).round();
        (ms >= 1.0 && ms <= u32::MAX as f64).then_some(Self(ms as u32))
    }

    #[inline]
    pub const fn as_millis(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl fmt::Display for LapTime {
    /// `1:23.456`, or `23.456` under a minute
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.0 / 60_000;
        let seconds = (self.0 % 60_000) / 1000;
        let millis = self.0 % 1000;
        if minutes > 0 {
            write!(f, "{}:{:02}.{:03}", minutes, seconds, millis)
        } else {
            write!(f, "{}.{:03}", seconds, millis)
        }
    }
}
