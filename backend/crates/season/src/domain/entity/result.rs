//! Race and Qualifying Result Entities

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Round selector for result lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    /// Most recent round with results
    Last,
    Number(u32),
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::Last => f.write_str("last"),
            Round::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FastestLap {
    /// 1 for the fastest lap of the race
    pub rank: u32,
    pub lap: u32,
    pub time: Option<String>,
    pub avg_speed_kph: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResultEntry {
    pub position: u32,
    pub number: Option<u32>,
    pub code: Option<String>,
    pub name: String,
    pub team: String,
    pub team_colour: &'static str,
    pub grid: u32,
    pub laps: u32,
    /// Provider wording, e.g. `Finished`, `+1 Lap`, `Engine`
    pub status: String,
    pub is_dnf: bool,
    pub points: f64,
    /// Winner's race time, or the gap for other classified finishers
    pub time: Option<String>,
    pub fastest_lap: Option<FastestLap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResults {
    pub season: String,
    pub round: u32,
    pub name: String,
    pub circuit: String,
    pub country: String,
    pub date: NaiveDate,
    pub results: Vec<RaceResultEntry>,
    pub dnf_count: usize,
    /// Car number of the driver ranked first on fastest lap
    pub fastest_lap_driver: Option<u32>,
    pub total_laps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifyingEntry {
    pub position: u32,
    pub number: Option<u32>,
    pub code: Option<String>,
    pub name: String,
    pub team: String,
    pub team_colour: &'static str,
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifyingResults {
    pub season: String,
    pub round: u32,
    pub name: String,
    pub date: NaiveDate,
    pub results: Vec<QualifyingEntry>,
}

/// One race of a driver's season
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRaceResult {
    pub round: u32,
    pub race: String,
    pub position: u32,
    pub grid: u32,
    pub points: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStats {
    pub races: usize,
    pub points: f64,
    pub wins: u32,
    pub podiums: u32,
    pub dnfs: u32,
    pub best_finish: Option<u32>,
    pub results: Vec<DriverRaceResult>,
}
