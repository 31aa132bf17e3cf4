//! Common Key Types
//!
//! Upstream providers identify sessions, meetings and rounds with plain
//! integers. These wrappers keep them from being mixed up.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Generic typed numeric key
///
/// Usage:
/// ```
/// use kernel::id::{Key, markers};
/// type SessionKey = Key<markers::Session>;
/// let key: SessionKey = Key::new(9158);
/// assert_eq!(key.get(), 9158);
/// ```
pub struct Key<T> {
    value: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(value: u32) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the raw upstream value
    pub const fn get(&self) -> u32 {
        self.value
    }
}

// Manual impls so the marker type does not need to implement anything.
impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Key<T> {}

impl<T> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> std::hash::Hash for Key<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.value)
    }
}

impl<T> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<u32> for Key<T> {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl<T> From<Key<T>> for u32 {
    fn from(key: Key<T>) -> Self {
        key.value
    }
}

/// Error when parsing a key from text (query strings, path segments)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid key: {0}")]
pub struct KeyParseError(pub String);

impl<T> FromStr for Key<T> {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self::new)
            .map_err(|_| KeyParseError(s.to_string()))
    }
}

impl<T> Serialize for Key<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Key<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::new)
    }
}

/// Marker types for different upstream keys
pub mod markers {
    /// Marker for live-telemetry session keys
    pub struct Session;

    /// Marker for race-weekend meeting keys
    pub struct Meeting;
}

/// Type aliases for common keys
pub type SessionKey = Key<markers::Session>;
pub type MeetingKey = Key<markers::Meeting>;
