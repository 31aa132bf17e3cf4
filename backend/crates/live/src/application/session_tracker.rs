//! Session Tracker
//!
//! Orchestrator state machine: `NoSession -> Live -> Stale -> NoSession`.
//! Liveness comes from the provider's session list; staleness from the
//! newest position timestamp seen for the session. A session dropped for
//! silence is remembered with its last marker, so the provider still listing
//! it does not make the frozen feed live again.

use crate::domain::entity::Session;
use chrono::{DateTime, Utc};
use kernel::id::SessionKey;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    NoSession,
    Live(Session),
    /// Live session with no feed progress past the staleness threshold
    Stale(Session),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::NoSession => "no_session",
            Phase::Live(_) => "live",
            Phase::Stale(_) => "stale",
        }
    }

    pub fn session_key(&self) -> Option<SessionKey> {
        match self {
            Phase::NoSession => None,
            Phase::Live(s) | Phase::Stale(s) => Some(s.key),
        }
    }
}

#[derive(Debug)]
struct Tracked {
    session: Session,
    /// Newest upstream record timestamp seen
    marker: Option<DateTime<Utc>>,
    /// When `marker` last moved (or tracking started)
    progressed_at: Instant,
}

#[derive(Debug)]
pub struct SessionTracker {
    stale_after: Duration,
    timeout: Duration,
    current: Option<Tracked>,
    /// Last session dropped for silence, with the marker it had reached
    retired: Option<(SessionKey, Option<DateTime<Utc>>)>,
}

impl SessionTracker {
    pub fn new(stale_after: Duration, timeout: Duration) -> Self {
        Self {
            stale_after,
            timeout,
            current: None,
            retired: None,
        }
    }

    /// Record the provider's view of the active session.
    ///
    /// Returns the key of a session that was dropped, so its cached data
    /// can be evicted.
    pub fn observe_session(&mut self, active: Option<Session>) -> Option<SessionKey> {
        let current_key = self.current.as_ref().map(|t| t.session.key);
        match active {
            Some(session) if current_key == Some(session.key) => {
                if let Some(tracked) = self.current.as_mut() {
                    tracked.session = session;
                }
                None
            }
            Some(session) => {
                let tracked = match self.retired.take() {
                    Some((key, marker)) if key == session.key => {
                        tracing::debug!(session_key = %key, "Dropped session still listed, held stale");
                        Tracked {
                            session,
                            marker,
                            progressed_at: Instant::now()
                                .checked_sub(self.stale_after)
                                .unwrap_or_else(Instant::now),
                        }
                    }
                    _ => {
                        tracing::info!(
                            session_key = %session.key,
                            name = %session.name,
                            circuit = %session.circuit,
                            "Live session detected"
                        );
                        Tracked {
                            session,
                            marker: None,
                            progressed_at: Instant::now(),
                        }
                    }
                };
                self.current = Some(tracked);
                current_key
            }
            None => {
                if let Some(key) = current_key {
                    tracing::info!(session_key = %key, "Live session ended");
                    self.current = None;
                }
                current_key
            }
        }
    }

    /// Note the newest feed timestamp for `key`; an advance resets staleness.
    pub fn observe_progress(&mut self, key: SessionKey, marker: Option<DateTime<Utc>>) {
        let Some(tracked) = self.current.as_mut().filter(|t| t.session.key == key) else {
            return;
        };
        if marker.is_some() && marker > tracked.marker {
            if self.stale_after <= tracked.progressed_at.elapsed() {
                tracing::info!(session_key = %key, "Live feed resumed");
            }
            tracked.marker = marker;
            tracked.progressed_at = Instant::now();
        }
    }

    /// Current phase. A session silent past the timeout is dropped and its
    /// key returned for eviction.
    pub fn phase(&mut self) -> (Phase, Option<SessionKey>) {
        let Some(tracked) = self.current.as_ref() else {
            return (Phase::NoSession, None);
        };
        let silent = tracked.progressed_at.elapsed();
        if silent >= self.timeout {
            let key = tracked.session.key;
            tracing::info!(
                session_key = %key,
                silent_secs = silent.as_secs(),
                "No live feed progress, dropping session"
            );
            self.retired = Some((key, tracked.marker));
            self.current = None;
            return (Phase::NoSession, Some(key));
        }
        if silent >= self.stale_after {
            return (Phase::Stale(tracked.session.clone()), None);
        }
        (Phase::Live(tracked.session.clone()), None)
    }
}
