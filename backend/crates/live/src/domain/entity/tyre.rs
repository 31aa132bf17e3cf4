//! Tyre Stint Entity
//!
//! Stints of one driver are ordered by stint number, contiguous (each starts
//! on the lap after the previous one ended) and non-overlapping. Only the last
//! stint may be open, and it is open exactly while the driver is on track.

use crate::domain::value_object::{CarNumber, TyreCompound};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TyreStint {
    pub car: CarNumber,
    pub stint_number: u32,
    pub compound: TyreCompound,
    pub lap_start: u32,
    /// `None` while the stint is ongoing
    pub lap_end: Option<u32>,
    /// Laps already on the set when it was fitted
    pub tyre_age_at_start: u32,
}

impl TyreStint {
    pub fn is_open(&self) -> bool {
        self.lap_end.is_none()
    }

    /// Laps on this set at `current_lap`.
    ///
    /// Closed stints count up to their last lap; open stints need the
    /// driver's current lap, which the stint feed itself does not carry.
    pub fn age_at(&self, current_lap: Option<u32>) -> u32 {
        let last = match (self.lap_end, current_lap) {
            (Some(end), _) => end,
            (None, Some(current)) => current.max(self.lap_start),
            (None, None) => self.lap_start,
        };
        last.saturating_sub(self.lap_start) + self.tyre_age_at_start
    }
}

/// Current tyre of a driver, as shown in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TyreState {
    pub compound: TyreCompound,
    pub age_laps: u32,
    pub stint_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StintError {
    #[error("car {car}: stint {stint} starts on lap {start}, expected {expected}")]
    Gap {
        car: CarNumber,
        stint: u32,
        start: u32,
        expected: u32,
    },
    #[error("car {car}: stint {stint} is open but is not the last stint")]
    OpenBeforeLast { car: CarNumber, stint: u32 },
    #[error("car {car}: stint {stint} ends before it starts")]
    Inverted { car: CarNumber, stint: u32 },
    #[error("car {car}: stints are not in order")]
    Unordered { car: CarNumber },
}

/// Check the stint invariants for one driver's stints.
pub fn validate_stints(stints: &[TyreStint]) -> Result<(), StintError> {
    for (i, stint) in stints.iter().enumerate() {
        let car = stint.car;
        if let Some(end) = stint.lap_end
            && end < stint.lap_start
        {
            return Err(StintError::Inverted {
                car,
                stint: stint.stint_number,
            });
        }

        let Some(next) = stints.get(i + 1) else {
            continue;
        };
        if next.car != car || next.stint_number <= stint.stint_number {
            return Err(StintError::Unordered { car });
        }
        let Some(end) = stint.lap_end else {
            return Err(StintError::OpenBeforeLast {
                car,
                stint: stint.stint_number,
            });
        };
        if next.lap_start != end + 1 {
            return Err(StintError::Gap {
                car,
                stint: next.stint_number,
                start: next.lap_start,
                expected: end + 1,
            });
        }
    }
    Ok(())
}
