//! Feed Normalizers
//!
//! One module per upstream endpoint. Each holds the raw payload shape and a
//! pure `normalize` function producing domain records. Records without a
//! usable car number or timestamp are dropped here so nothing downstream has
//! to handle them.

pub mod interval;
pub mod lap;
pub mod pit;
pub mod position;
pub mod race_control;
pub mod radio;
pub mod session;
pub mod stint;
pub mod weather;

use crate::domain::value_object::CarNumber;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;

/// Upstream timestamps are RFC 3339, occasionally without an offset (UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub(crate) fn timestamp(raw: &Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref().and_then(parse_timestamp)
}

pub(crate) fn car(raw: Option<u32>) -> Option<CarNumber> {
    raw.and_then(CarNumber::new)
}

/// Decode each row on its own, dropping the ones that do not fit `T`.
pub(crate) fn decode_rows<T: DeserializeOwned>(endpoint: &str, rows: Vec<serde_json::Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::debug!(endpoint, %error, "Dropping malformed row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 9, 1, 13, 3, 0).unwrap();
        assert_eq!(parse_timestamp("2024-09-01T13:03:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-09-01T15:03:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-09-01T13:03:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-09-01T13:03:00.250000+00:00").map(|t| t.timestamp_subsec_millis()),
            Some(250)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_wrongly_typed_row_is_skipped() {
        let rows: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"driver_number": 16, "lap_number": 18, "pit_duration": 22.9, "date": "2024-09-01T13:31:00+00:00"},
                {"driver_number": "sixteen", "lap_number": 19, "pit_duration": 23.1, "date": "2024-09-01T13:33:00+00:00"},
                {"driver_number": 81, "lap_number": 20, "pit_duration": 23.4, "date": "2024-09-01T13:35:00+00:00"}
            ]"#,
        )
        .unwrap();

        let raw: Vec<pit::RawPit> = decode_rows("pit", rows);
        assert_eq!(raw.len(), 2);
        let stops = pit::normalize(raw);
        let cars: Vec<u32> = stops.iter().map(|s| s.car.get()).collect();
        assert_eq!(cars, [16, 81]);
    }
}
