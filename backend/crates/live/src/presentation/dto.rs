//! API DTOs (Data Transfer Objects)

use crate::error::{LiveError, LiveResult};
use kernel::id::SessionKey;
use serde::Deserialize;

/// Query for GET /api/live/snapshot and /api/live/position-chart
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotQuery {
    /// Serve this session instead of the tracked one
    #[serde(default)]
    pub session: Option<SessionKey>,
}

/// Query for GET /api/live/laptimes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LapTimesQuery {
    #[serde(default)]
    pub session: Option<SessionKey>,
    /// Comma-separated car numbers, e.g. `1,44`
    #[serde(default)]
    pub drivers: Option<String>,
}

impl LapTimesQuery {
    pub fn drivers(&self) -> LiveResult<Option<Vec<u32>>> {
        let Some(raw) = self.drivers.as_deref() else {
            return Ok(None);
        };
        let cars = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| LiveError::InvalidRequest(format!("drivers: {part} is not a car number")))
            })
            .collect::<LiveResult<Vec<_>>>()?;
        Ok((!cars.is_empty()).then_some(cars))
    }
}

/// Query for GET /api/live/race-control
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceControlQuery {
    /// Last sequence number the client has; everything newer is returned
    #[serde(default)]
    pub since: u64,
}
