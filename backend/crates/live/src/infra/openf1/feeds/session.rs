use super::{parse_timestamp, timestamp};
use crate::domain::entity::{Session, SessionKind, SessionStatus};
use chrono::{DateTime, Duration, Utc};
use kernel::id::{MeetingKey, SessionKey};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawSession {
    pub session_key: Option<u32>,
    pub meeting_key: Option<u32>,
    #[serde(default)]
    pub session_name: String,
    #[serde(default)]
    pub session_type: String,
    pub circuit_short_name: Option<String>,
    pub location: Option<String>,
    pub country_name: Option<String>,
    pub year: Option<i32>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

/// Sessions with a key and start time, oldest first, status as of `now`.
pub fn normalize(raw: Vec<RawSession>, now: DateTime<Utc>, buffer: Duration) -> Vec<Session> {
    let mut sessions: Vec<Session> = raw
        .into_iter()
        .filter_map(|r| {
            let key = SessionKey::new(r.session_key?);
            let starts_at = r.date_start.as_deref().and_then(parse_timestamp)?;
            let session = Session {
                key,
                meeting_key: r.meeting_key.map(MeetingKey::new),
                kind: SessionKind::from_upstream(&r.session_type, &r.session_name),
                name: r.session_name,
                circuit: r.circuit_short_name.or(r.location).unwrap_or_default(),
                country: r.country_name.unwrap_or_default(),
                year: r.year,
                starts_at,
                ends_at: timestamp(&r.date_end),
                status: SessionStatus::Scheduled,
            };
            Some(session.with_status_at(now, buffer))
        })
        .collect();
    sessions.sort_by_key(|s| (s.starts_at, s.key));
    sessions.dedup_by_key(|s| s.key);
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PAYLOAD: &str = r#"[
        {"session_key": 9590, "meeting_key": 1242, "session_name": "Race", "session_type": "Race",
         "circuit_short_name": "Monza", "country_name": "Italy", "year": 2024,
         "date_start": "2024-09-01T13:00:00+00:00", "date_end": "2024-09-01T15:00:00+00:00"},
        {"session_key": null, "session_name": "Race", "session_type": "Race",
         "date_start": "2024-09-01T13:00:00+00:00"}
    ]"#;

    #[test]
    fn test_normalize_session() {
        let raw: Vec<RawSession> = serde_json::from_str(PAYLOAD).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 15, 20, 0).unwrap();
        let sessions = normalize(raw, now, Duration::minutes(30));

        assert_eq!(sessions.len(), 1);
        let race = &sessions[0];
        assert_eq!(race.key, SessionKey::new(9590));
        assert_eq!(race.kind, SessionKind::Race);
        assert_eq!(race.circuit, "Monza");
        assert_eq!(race.status, SessionStatus::Active);
    }
}
