//! Championship Standings Entities

use crate::domain::entity::SeasonStats;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStanding {
    pub position: u32,
    /// Provider's stable driver id, e.g. `max_verstappen`
    pub driver_id: String,
    /// Permanent car number; missing for some historical drivers
    pub number: Option<u32>,
    pub code: Option<String>,
    pub name: String,
    pub nationality: String,
    pub team: String,
    pub team_colour: &'static str,
    pub points: f64,
    pub wins: u32,
    pub gap_to_leader: f64,
    /// Points behind the driver one place ahead (zero for the leader)
    pub gap_to_prev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorStanding {
    pub position: u32,
    pub constructor_id: String,
    pub team: String,
    pub team_colour: &'static str,
    pub points: f64,
    pub wins: u32,
    pub gap_to_leader: f64,
}

/// A driver's season: standing, race-by-race record and team-mate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub driver: DriverStanding,
    pub stats: SeasonStats,
    pub teammate: Option<DriverStanding>,
}

/// Standings table after a given round
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings<T> {
    pub season: String,
    pub round: Option<u32>,
    pub entries: Vec<T>,
}

impl<T> Standings<T> {
    pub fn empty(season: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            round: None,
            entries: Vec::new(),
        }
    }
}
