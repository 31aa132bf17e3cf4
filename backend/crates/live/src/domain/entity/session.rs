//! Session Entity
//!
//! One timed event of a race weekend, as announced by the telemetry provider.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{MeetingKey, SessionKey};
use serde::Serialize;

/// Sessions without a published end are assumed to run at most this long.
const OPEN_ENDED_SESSION_HOURS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Practice,
    Qualifying,
    Sprint,
    Race,
}

impl SessionKind {
    /// Classify from upstream `session_type` / `session_name`.
    ///
    /// Sprint qualifying (and the older "Sprint Shootout") is a qualifying
    /// format; only the sprint race itself is `Sprint`.
    pub fn from_upstream(session_type: &str, session_name: &str) -> Self {
        let name = session_name.to_ascii_lowercase();
        if name.contains("shootout") || name.contains("sprint qualifying") {
            return SessionKind::Qualifying;
        }
        if name.contains("sprint") {
            return SessionKind::Sprint;
        }
        match session_type.to_ascii_lowercase().as_str() {
            "race" => SessionKind::Race,
            "qualifying" => SessionKind::Qualifying,
            _ if name.contains("race") => SessionKind::Race,
            _ if name.contains("qualifying") => SessionKind::Qualifying,
            _ => SessionKind::Practice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Active,
    Ended,
}

/// Session entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub key: SessionKey,
    pub meeting_key: Option<MeetingKey>,
    pub name: String,
    pub kind: SessionKind,
    pub circuit: String,
    pub country: String,
    pub year: Option<i32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
}

impl Session {
    /// Status at `now`. A session stays active for `buffer` past its
    /// scheduled end since the feeds keep flowing through the cool-down lap
    /// and paperwork.
    pub fn status_at(&self, now: DateTime<Utc>, buffer: Duration) -> SessionStatus {
        if now < self.starts_at {
            return SessionStatus::Scheduled;
        }
        let end = self
            .ends_at
            .unwrap_or(self.starts_at + Duration::hours(OPEN_ENDED_SESSION_HOURS));
        if now <= end + buffer {
            SessionStatus::Active
        } else {
            SessionStatus::Ended
        }
    }

    pub fn is_live_at(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        self.status_at(now, buffer) == SessionStatus::Active
    }

    pub fn with_status_at(mut self, now: DateTime<Utc>, buffer: Duration) -> Self {
        self.status = self.status_at(now, buffer);
        self
    }
}
