//! Race Control Log
//!
//! Translated race-control messages for one session, each tagged with a
//! sequence number. Clients poll with the last number they saw. Numbers keep
//! counting across sessions so a client that missed a session change never
//! waits for numbers it has already passed.

use crate::domain::entity::{RaceControlCategory, RaceControlMessage, RawRaceControl};
use crate::domain::services::{RaceControlTranslator, Translation};
use chrono::{DateTime, Utc};
use kernel::id::SessionKey;
use std::collections::HashSet;

#[derive(Debug)]
pub struct RaceControlLog {
    session: Option<SessionKey>,
    next_seq: u64,
    messages: Vec<RaceControlMessage>,
    seen: HashSet<(DateTime<Utc>, String)>,
}

impl Default for RaceControlLog {
    fn default() -> Self {
        Self {
            session: None,
            next_seq: 1,
            messages: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl RaceControlLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<SessionKey> {
        self.session
    }

    /// Append the messages of `raw` not seen before.
    ///
    /// A different `session` clears the log first; the previous key is
    /// returned in that case.
    pub fn ingest(
        &mut self,
        session: SessionKey,
        raw: &[RawRaceControl],
        translator: &RaceControlTranslator,
    ) -> Option<SessionKey> {
        let replaced = match self.session {
            Some(current) if current == session => None,
            previous => {
                self.clear();
                self.session = Some(session);
                previous
            }
        };

        let mut added = 0usize;
        for message in raw {
            if !self.seen.insert((message.at, message.message.clone())) {
                continue;
            }
            let translation = translator.translate(&message.message);
            let category = match &translation {
                Translation::Translated { category, .. } => *category,
                Translation::Passthrough => {
                    RaceControlCategory::from_upstream(message.category_hint.as_deref())
                }
            };
            self.messages.push(RaceControlMessage {
                seq: self.next_seq,
                at: message.at,
                category,
                flag: message.flag.clone(),
                car: message.car,
                lap: message.lap,
                raw: message.message.clone(),
                normalized: translation.text_or(&message.message).to_string(),
                rule: translation.rule(),
            });
            self.next_seq += 1;
            added += 1;
        }
        if added > 0 {
            tracing::debug!(session_key = %session, added, last_seq = self.last_seq(), "Race control messages added");
        }
        replaced
    }

    /// Messages with a sequence number above `seq`, oldest first.
    pub fn since(&self, seq: u64) -> Vec<RaceControlMessage> {
        let start = self.messages.partition_point(|m| m.seq <= seq);
        self.messages[start..].to_vec()
    }

    /// The newest `n` messages, oldest first.
    pub fn latest(&self, n: usize) -> Vec<RaceControlMessage> {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..].to_vec()
    }

    /// Highest sequence number handed out so far (0 before the first).
    pub fn last_seq(&self) -> u64 {
        self.next_seq - 1
    }

    /// Forget the current session; numbering continues.
    pub fn reset(&mut self) {
        self.clear();
        self.session = None;
    }

    fn clear(&mut self) {
        self.messages.clear();
        self.seen.clear();
    }
}
