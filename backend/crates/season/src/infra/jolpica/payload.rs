//! Jolpica Payloads
//!
//! Ergast-format JSON: every number arrives as a string and everything sits
//! under `MRData`. Unparsable rows are dropped with a warning rather than
//! failing the whole table.

use crate::domain::entity::{
    ConstructorStanding, DriverRaceResult, DriverStanding, FastestLap, QualifyingEntry, QualifyingResults,
    Race, RaceResultEntry, RaceResults, Schedule, SessionSlot, Standings, WeekendSession,
};
use crate::domain::results::{is_finished, summarize};
use crate::domain::standings::{apply_constructor_gaps, apply_driver_gaps};
use crate::domain::team;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

/// Race start assumed when the provider publishes a date only
fn default_race_time() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "MRData")]
    pub data: T,
}

// ============================================================================
// Schedule
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RaceData {
    #[serde(rename = "RaceTable")]
    pub race_table: RaceTable,
}

#[derive(Debug, Deserialize)]
pub struct RaceTable {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(rename = "Races", default)]
    pub races: Vec<RawRace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRace {
    pub round: String,
    pub race_name: String,
    #[serde(rename = "Circuit")]
    pub circuit: RawCircuit,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(rename = "FirstPractice", default)]
    pub first_practice: Option<RawSlot>,
    #[serde(rename = "SecondPractice", default)]
    pub second_practice: Option<RawSlot>,
    #[serde(rename = "ThirdPractice", default)]
    pub third_practice: Option<RawSlot>,
    #[serde(rename = "SprintQualifying", alias = "SprintShootout", default)]
    pub sprint_qualifying: Option<RawSlot>,
    #[serde(rename = "Sprint", default)]
    pub sprint: Option<RawSlot>,
    #[serde(rename = "Qualifying", default)]
    pub qualifying: Option<RawSlot>,
    /// Only on results endpoints
    #[serde(rename = "Results", default)]
    pub results: Vec<RawResult>,
    /// Only on qualifying endpoints
    #[serde(rename = "QualifyingResults", default)]
    pub qualifying_results: Vec<RawQualifying>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCircuit {
    pub circuit_id: String,
    pub circuit_name: String,
    #[serde(rename = "Location")]
    pub location: RawLocation,
}

#[derive(Debug, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub long: Option<String>,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct RawSlot {
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim().trim_end_matches('Z'), "%H:%M:%S").ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn slot(kind: WeekendSession, raw: &RawSlot) -> Option<SessionSlot> {
    let date = parse_date(&raw.date)?;
    let starts_at = raw
        .time
        .as_deref()
        .and_then(parse_time)
        .map(|t| date.and_time(t).and_utc());
    Some(SessionSlot {
        kind,
        date,
        starts_at,
    })
}

fn race(raw: RawRace) -> Option<Race> {
    let (Ok(round), Some(date)) = (raw.round.trim().parse::<u32>(), parse_date(&raw.date)) else {
        tracing::warn!(round = %raw.round, date = %raw.date, "Skipping unparsable race");
        return None;
    };
    let race_time = raw.time.as_deref().and_then(parse_time);
    let starts_at: DateTime<Utc> = date.and_time(race_time.unwrap_or_else(default_race_time)).and_utc();

    let weekend = [
        (WeekendSession::FirstPractice, &raw.first_practice),
        (WeekendSession::SecondPractice, &raw.second_practice),
        (WeekendSession::ThirdPractice, &raw.third_practice),
        (WeekendSession::SprintQualifying, &raw.sprint_qualifying),
        (WeekendSession::Sprint, &raw.sprint),
        (WeekendSession::Qualifying, &raw.qualifying),
    ];
    let mut sessions: Vec<SessionSlot> = weekend
        .into_iter()
        .filter_map(|(kind, raw)| raw.as_ref().and_then(|r| slot(kind, r)))
        .collect();
    // Sprint weekends run qualifying before the sprint on some years; sort
    // by actual time where known.
    sessions.sort_by_key(|s| (s.date, s.starts_at));
    sessions.push(SessionSlot {
        kind: WeekendSession::Race,
        date,
        starts_at: race_time.map(|t| date.and_time(t).and_utc()),
    });

    let location = raw.circuit.location;
    Some(Race {
        round,
        name: raw.race_name,
        circuit: raw.circuit.circuit_name,
        circuit_id: raw.circuit.circuit_id,
        country: location.country,
        locality: location.locality,
        lat: location.lat.and_then(|v| v.trim().parse().ok()),
        lng: location.long.and_then(|v| v.trim().parse().ok()),
        date,
        starts_at,
        sessions,
        is_past: false,
        is_next: false,
    })
}

pub fn normalize_schedule(data: RaceData, fallback_season: &str) -> Schedule {
    let table = data.race_table;
    let mut races: Vec<Race> = table.races.into_iter().filter_map(race).collect();
    races.sort_by_key(|r| r.round);
    Schedule {
        season: table.season.unwrap_or_else(|| fallback_season.to_string()),
        races,
    }
}

// ============================================================================
// Standings
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StandingsData {
    #[serde(rename = "StandingsTable")]
    pub standings_table: StandingsTable,
}

#[derive(Debug, Deserialize)]
pub struct StandingsTable {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(rename = "StandingsLists", default)]
    pub lists: Vec<StandingsList>,
}

#[derive(Debug, Deserialize)]
pub struct StandingsList {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub round: Option<String>,
    #[serde(rename = "DriverStandings", default)]
    pub drivers: Vec<RawDriverStanding>,
    #[serde(rename = "ConstructorStandings", default)]
    pub constructors: Vec<RawConstructorStanding>,
}

#[derive(Debug, Deserialize)]
pub struct RawDriverStanding {
    #[serde(default)]
    pub position: Option<String>,
    pub points: String,
    #[serde(default)]
    pub wins: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: RawDriver,
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<RawConstructor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDriver {
    #[serde(default)]
    pub driver_id: String,
    #[serde(default)]
    pub permanent_number: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    pub given_name: String,
    pub family_name: String,
    #[serde(default)]
    pub nationality: String,
}

#[derive(Debug, Deserialize)]
pub struct RawConstructorStanding {
    #[serde(default)]
    pub position: Option<String>,
    pub points: String,
    #[serde(default)]
    pub wins: Option<String>,
    #[serde(rename = "Constructor")]
    pub constructor: RawConstructor,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConstructor {
    pub constructor_id: String,
    pub name: String,
}

fn number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// Position as published; unclassified entries keep their table order.
fn position(raw: Option<&str>, index: usize) -> u32 {
    number(raw).unwrap_or(index as u32 + 1)
}

fn split_table(table: StandingsTable, fallback_season: &str) -> (String, Option<u32>, Option<StandingsList>) {
    let season = table.season.unwrap_or_else(|| fallback_season.to_string());
    let Some(list) = table.lists.into_iter().next() else {
        return (season, None, None);
    };
    let season = list.season.clone().unwrap_or(season);
    let round = number(list.round.as_deref());
    (season, round, Some(list))
}

pub fn normalize_driver_standings(data: StandingsData, fallback_season: &str) -> Standings<DriverStanding> {
    let (season, round, list) = split_table(data.standings_table, fallback_season);
    let Some(list) = list else {
        return Standings::empty(season);
    };

    let mut entries: Vec<DriverStanding> = list
        .drivers
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let Ok(points) = raw.points.trim().parse::<f64>() else {
                tracing::warn!(driver = %raw.driver.family_name, points = %raw.points, "Skipping unparsable standing");
                return None;
            };
            let constructor = raw.constructors.last();
            Some(DriverStanding {
                position: position(raw.position.as_deref(), i),
                driver_id: raw.driver.driver_id,
                number: number(raw.driver.permanent_number.as_deref()),
                code: raw.driver.code,
                name: format!("{} {}", raw.driver.given_name, raw.driver.family_name),
                nationality: raw.driver.nationality,
                team: constructor.map(|c| c.name.clone()).unwrap_or_default(),
                team_colour: constructor.map_or(team::DEFAULT_COLOUR, |c| team::colour(&c.constructor_id)),
                points,
                wins: number(raw.wins.as_deref()).unwrap_or(0),
                gap_to_leader: 0.0,
                gap_to_prev: 0.0,
            })
        })
        .collect();
    entries.sort_by_key(|e| e.position);
    apply_driver_gaps(&mut entries);

    Standings {
        season,
        round,
        entries,
    }
}

pub fn normalize_constructor_standings(
    data: StandingsData,
    fallback_season: &str,
) -> Standings<ConstructorStanding> {
    let (season, round, list) = split_table(data.standings_table, fallback_season);
    let Some(list) = list else {
        return Standings::empty(season);
    };

    let mut entries: Vec<ConstructorStanding> = list
        .constructors
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let points = raw.points.trim().parse::<f64>().ok()?;
            Some(ConstructorStanding {
                position: position(raw.position.as_deref(), i),
                team_colour: team::colour(&raw.constructor.constructor_id),
                constructor_id: raw.constructor.constructor_id,
                team: raw.constructor.name,
                points,
                wins: number(raw.wins.as_deref()).unwrap_or(0),
                gap_to_leader: 0.0,
            })
        })
        .collect();
    entries.sort_by_key(|e| e.position);
    apply_constructor_gaps(&mut entries);

    Standings {
        season,
        round,
        entries,
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResult {
    /// Car number raced with, which may differ from the permanent one
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub points: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: RawDriver,
    #[serde(rename = "Constructor", default)]
    pub constructor: Option<RawConstructor>,
    #[serde(default)]
    pub grid: Option<String>,
    #[serde(default)]
    pub laps: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "Time", default)]
    pub time: Option<RawTime>,
    #[serde(rename = "FastestLap", default)]
    pub fastest_lap: Option<RawFastestLap>,
}

#[derive(Debug, Deserialize)]
pub struct RawTime {
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawFastestLap {
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub lap: Option<String>,
    #[serde(rename = "Time", default)]
    pub time: Option<RawTime>,
    #[serde(rename = "AverageSpeed", default)]
    pub average_speed: Option<RawSpeed>,
}

#[derive(Debug, Deserialize)]
pub struct RawSpeed {
    #[serde(default)]
    pub speed: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawQualifying {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: RawDriver,
    #[serde(rename = "Constructor", default)]
    pub constructor: Option<RawConstructor>,
    #[serde(rename = "Q1", default)]
    pub q1: Option<String>,
    #[serde(rename = "Q2", default)]
    pub q2: Option<String>,
    #[serde(rename = "Q3", default)]
    pub q3: Option<String>,
}

/// Display fields shared by result rows
struct Identity {
    number: Option<u32>,
    code: Option<String>,
    name: String,
    team: String,
    team_colour: &'static str,
}

fn identity(number_raced: Option<&str>, driver: RawDriver, constructor: Option<RawConstructor>) -> Identity {
    Identity {
        number: number(number_raced).or_else(|| number(driver.permanent_number.as_deref())),
        code: driver.code,
        name: format!("{} {}", driver.given_name, driver.family_name),
        team_colour: constructor
            .as_ref()
            .map_or(team::DEFAULT_COLOUR, |c| team::colour(&c.constructor_id)),
        team: constructor.map(|c| c.name).unwrap_or_default(),
    }
}

fn text(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn result_entry(index: usize, raw: RawResult) -> RaceResultEntry {
    let id = identity(raw.number.as_deref(), raw.driver, raw.constructor);
    let fastest_lap = raw.fastest_lap.map(|f| FastestLap {
        rank: number(f.rank.as_deref()).unwrap_or(0),
        lap: number(f.lap.as_deref()).unwrap_or(0),
        time: text(f.time.and_then(|t| t.time)),
        avg_speed_kph: number(f.average_speed.and_then(|s| s.speed).as_deref()),
    });
    RaceResultEntry {
        position: position(raw.position.as_deref(), index),
        number: id.number,
        code: id.code,
        name: id.name,
        team: id.team,
        team_colour: id.team_colour,
        grid: number(raw.grid.as_deref()).unwrap_or(0),
        laps: number(raw.laps.as_deref()).unwrap_or(0),
        is_dnf: !is_finished(&raw.status),
        status: raw.status,
        points: number(raw.points.as_deref()).unwrap_or(0.0),
        time: text(raw.time.and_then(|t| t.time)),
        fastest_lap,
    }
}

/// First race of the table with its result rows split off.
fn single_race(data: RaceData, fallback_season: &str) -> Option<(String, Race, Vec<RawResult>, Vec<RawQualifying>)> {
    let table = data.race_table;
    let season = table.season.unwrap_or_else(|| fallback_season.to_string());
    let mut raw = table.races.into_iter().next()?;
    let results = std::mem::take(&mut raw.results);
    let qualifying = std::mem::take(&mut raw.qualifying_results);
    Some((season, race(raw)?, results, qualifying))
}

/// Classification of one round; `None` when the provider has none yet.
pub fn normalize_race_results(data: RaceData, fallback_season: &str) -> Option<RaceResults> {
    let (season, race, rows, _) = single_race(data, fallback_season)?;
    let mut results: Vec<RaceResultEntry> = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| result_entry(i, raw))
        .collect();
    results.sort_by_key(|r| r.position);
    let (dnf_count, fastest_lap_driver, total_laps) = summarize(&results);

    Some(RaceResults {
        season,
        round: race.round,
        name: race.name,
        circuit: race.circuit,
        country: race.country,
        date: race.date,
        results,
        dnf_count,
        fastest_lap_driver,
        total_laps,
    })
}

pub fn normalize_qualifying(data: RaceData, fallback_season: &str) -> Option<QualifyingResults> {
    let (season, race, _, rows) = single_race(data, fallback_season)?;
    let mut results: Vec<QualifyingEntry> = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let id = identity(raw.number.as_deref(), raw.driver, raw.constructor);
            QualifyingEntry {
                position: position(raw.position.as_deref(), i),
                number: id.number,
                code: id.code,
                name: id.name,
                team: id.team,
                team_colour: id.team_colour,
                q1: text(raw.q1),
                q2: text(raw.q2),
                q3: text(raw.q3),
            }
        })
        .collect();
    results.sort_by_key(|r| r.position);

    Some(QualifyingResults {
        season,
        round: race.round,
        name: race.name,
        date: race.date,
        results,
    })
}

/// One row per race the driver took part in.
pub fn normalize_driver_results(data: RaceData) -> Vec<DriverRaceResult> {
    data.race_table
        .races
        .into_iter()
        .filter_map(|raw| {
            let RawRace {
                round,
                race_name,
                results,
                ..
            } = raw;
            let result = results.into_iter().next()?;
            let (Ok(round), Some(position)) = (round.trim().parse::<u32>(), number(result.position.as_deref())) else {
                tracing::warn!(round = %round, race = %race_name, "Skipping unparsable driver result");
                return None;
            };
            Some(DriverRaceResult {
                round,
                race: race_name,
                position,
                grid: number(result.grid.as_deref()).unwrap_or(0),
                points: number(result.points.as_deref()).unwrap_or(0.0),
                status: result.status,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value::<Envelope<T>>(value).unwrap().data
    }

    #[test]
    fn test_schedule() {
        let data: RaceData = decode(json!({"MRData": {"RaceTable": {"season": "2024", "Races": [
            {
                "season": "2024", "round": "6", "raceName": "Miami Grand Prix",
                "Circuit": {"circuitId": "miami", "circuitName": "Miami International Autodrome",
                    "Location": {"lat": "25.9581", "long": "-80.2389", "locality": "Miami", "country": "USA"}},
                "date": "2024-05-05", "time": "20:00:00Z",
                "FirstPractice": {"date": "2024-05-03", "time": "16:30:00Z"},
                "SprintQualifying": {"date": "2024-05-03", "time": "20:30:00Z"},
                "Sprint": {"date": "2024-05-04", "time": "16:00:00Z"},
                "Qualifying": {"date": "2024-05-04", "time": "20:00:00Z"}
            },
            {
                "season": "2024", "round": "1", "raceName": "Bahrain Grand Prix",
                "Circuit": {"circuitId": "bahrain", "circuitName": "Bahrain International Circuit",
                    "Location": {"lat": "26.0325", "long": "50.5106", "locality": "Sakhir", "country": "Bahrain"}},
                "date": "2024-03-02"
            },
            {"round": "x", "raceName": "Broken", "date": "soon",
                "Circuit": {"circuitId": "b", "circuitName": "B", "Location": {}}}
        ]}}}));

        let schedule = normalize_schedule(data, "current");
        assert_eq!(schedule.season, "2024");
        assert_eq!(schedule.races.len(), 2);
        assert_eq!(schedule.races[0].round, 1);
        // Date-only race gets the default start time
        assert_eq!(
            schedule.races[0].starts_at,
            Utc.with_ymd_and_hms(2024, 3, 2, 14, 0, 0).unwrap()
        );

        let miami = &schedule.races[1];
        assert_eq!(miami.lng, Some(-80.2389));
        let kinds: Vec<_> = miami.sessions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WeekendSession::FirstPractice,
                WeekendSession::SprintQualifying,
                WeekendSession::Sprint,
                WeekendSession::Qualifying,
                WeekendSession::Race,
            ]
        );
    }

    #[test]
    fn test_driver_standings() {
        let data: StandingsData = decode(json!({"MRData": {"StandingsTable": {"season": "2024", "StandingsLists": [{
            "season": "2024", "round": "24",
            "DriverStandings": [
                {"position": "1", "points": "437", "wins": "9",
                    "Driver": {"permanentNumber": "33", "code": "VER", "givenName": "Max", "familyName": "Verstappen", "nationality": "Dutch"},
                    "Constructors": [{"constructorId": "red_bull", "name": "Red Bull"}]},
                {"position": "2", "points": "374", "wins": "4",
                    "Driver": {"permanentNumber": "4", "code": "NOR", "givenName": "Lando", "familyName": "Norris", "nationality": "British"},
                    "Constructors": [{"constructorId": "mclaren", "name": "McLaren"}]},
                {"positionText": "-", "points": "0", "wins": "0",
                    "Driver": {"givenName": "Reserve", "familyName": "Driver"},
                    "Constructors": []}
            ]
        }]}}}));

        let standings = normalize_driver_standings(data, "current");
        assert_eq!(standings.round, Some(24));
        assert_eq!(standings.entries.len(), 3);
        let norris = &standings.entries[1];
        assert_eq!(norris.name, "Lando Norris");
        assert_eq!(norris.number, Some(4));
        assert_eq!(norris.team_colour, "#FF8000");
        assert_eq!(norris.gap_to_leader, 63.0);
        let reserve = &standings.entries[2];
        assert_eq!(reserve.position, 3);
        assert_eq!(reserve.team_colour, team::DEFAULT_COLOUR);
    }

    #[test]
    fn test_empty_standings_before_first_round() {
        let data: StandingsData =
            decode(json!({"MRData": {"StandingsTable": {"season": "2026", "StandingsLists": []}}}));
        let standings = normalize_constructor_standings(data, "current");
        assert_eq!(standings, Standings::empty("2026"));
    }

    #[test]
    fn test_constructor_standings() {
        let data: StandingsData = decode(json!({"MRData": {"StandingsTable": {"StandingsLists": [{
            "season": "2024", "round": "24",
            "ConstructorStandings": [
                {"position": "1", "points": "666", "wins": "6", "Constructor": {"constructorId": "mclaren", "name": "McLaren"}},
                {"position": "2", "points": "652", "wins": "5", "Constructor": {"constructorId": "ferrari", "name": "Ferrari"}}
            ]
        }]}}}));
        let standings = normalize_constructor_standings(data, "current");
        assert_eq!(standings.season, "2024");
        assert_eq!(standings.entries[1].gap_to_leader, 14.0);
        assert_eq!(standings.entries[1].team_colour, "#E8002D");
    }

    #[test]
    fn test_race_results() {
        let data: RaceData = decode(json!({"MRData": {"RaceTable": {"season": "2024", "round": "16", "Races": [{
            "round": "16", "raceName": "Italian Grand Prix", "date": "2024-09-01", "time": "13:00:00Z",
            "Circuit": {"circuitId": "monza", "circuitName": "Autodromo Nazionale di Monza",
                "Location": {"locality": "Monza", "country": "Italy"}},
            "Results": [
                {"number": "81", "position": "2", "points": "18", "grid": "2", "laps": "53", "status": "Finished",
                    "Driver": {"driverId": "piastri", "permanentNumber": "81", "code": "PIA", "givenName": "Oscar", "familyName": "Piastri"},
                    "Constructor": {"constructorId": "mclaren", "name": "McLaren"},
                    "Time": {"time": "+2.664"},
                    "FastestLap": {"rank": "2", "lap": "40", "Time": {"time": "1:21.734"}}},
                {"number": "16", "position": "1", "points": "25", "grid": "4", "laps": "53", "status": "Finished",
                    "Driver": {"driverId": "leclerc", "permanentNumber": "16", "code": "LEC", "givenName": "Charles", "familyName": "Leclerc"},
                    "Constructor": {"constructorId": "ferrari", "name": "Ferrari"},
                    "Time": {"time": "1:14:40.727"},
                    "FastestLap": {"rank": "5", "lap": "32", "Time": {"time": "1:22.122"}, "AverageSpeed": {"units": "kph", "speed": "253.961"}}},
                {"number": "4", "position": "3", "points": "16", "grid": "1", "laps": "53", "status": "Finished",
                    "Driver": {"driverId": "norris", "code": "NOR", "givenName": "Lando", "familyName": "Norris"},
                    "Constructor": {"constructorId": "mclaren", "name": "McLaren"},
                    "FastestLap": {"rank": "1", "lap": "51", "Time": {"time": "1:21.432"}}},
                {"number": "23", "position": "20", "points": "0", "grid": "17", "laps": "6", "status": "Brakes",
                    "Driver": {"driverId": "albon", "code": "ALB", "givenName": "Alexander", "familyName": "Albon"},
                    "Constructor": {"constructorId": "williams", "name": "Williams"}}
            ]
        }]}}}));

        let results = normalize_race_results(data, "current").unwrap();
        assert_eq!(results.round, 16);
        assert_eq!(results.country, "Italy");
        let order: Vec<_> = results.results.iter().map(|r| r.code.as_deref()).collect();
        assert_eq!(order, vec![Some("LEC"), Some("PIA"), Some("NOR"), Some("ALB")]);
        assert_eq!(results.dnf_count, 1);
        assert_eq!(results.fastest_lap_driver, Some(4));
        assert_eq!(results.total_laps, 53);

        let winner = &results.results[0];
        assert_eq!(winner.points, 25.0);
        assert_eq!(winner.time.as_deref(), Some("1:14:40.727"));
        assert_eq!(winner.fastest_lap.as_ref().and_then(|f| f.avg_speed_kph), Some(253.961));
        assert!(results.results[3].is_dnf);
        assert_eq!(results.results[3].time, None);
    }

    #[test]
    fn test_round_without_results() {
        let data: RaceData = decode(json!({"MRData": {"RaceTable": {"season": "2025", "round": "24", "Races": []}}}));
        assert_eq!(normalize_race_results(data, "current"), None);
    }

    #[test]
    fn test_qualifying() {
        let data: RaceData = decode(json!({"MRData": {"RaceTable": {"season": "2024", "Races": [{
            "round": "16", "raceName": "Italian Grand Prix", "date": "2024-09-01",
            "Circuit": {"circuitId": "monza", "circuitName": "Monza", "Location": {}},
            "QualifyingResults": [
                {"number": "4", "position": "1", "Q1": "1:20.001", "Q2": "1:19.900", "Q3": "1:19.327",
                    "Driver": {"driverId": "norris", "code": "NOR", "givenName": "Lando", "familyName": "Norris"},
                    "Constructor": {"constructorId": "mclaren", "name": "McLaren"}},
                {"number": "18", "position": "19", "Q1": "1:21.200", "Q2": "",
                    "Driver": {"driverId": "stroll", "code": "STR", "givenName": "Lance", "familyName": "Stroll"}}
            ]
        }]}}}));

        let qualifying = normalize_qualifying(data, "current").unwrap();
        assert_eq!(qualifying.season, "2024");
        assert_eq!(qualifying.results[0].q3.as_deref(), Some("1:19.327"));
        let stroll = &qualifying.results[1];
        assert_eq!(stroll.number, Some(18));
        assert_eq!(stroll.q2, None);
        assert_eq!(stroll.q3, None);
        assert_eq!(stroll.team_colour, team::DEFAULT_COLOUR);
    }

    #[test]
    fn test_driver_results() {
        let data: RaceData = decode(json!({"MRData": {"RaceTable": {"season": "2024", "driverId": "leclerc", "Races": [
            {"round": "1", "raceName": "Bahrain Grand Prix", "date": "2024-03-02",
                "Circuit": {"circuitId": "bahrain", "circuitName": "Bahrain", "Location": {}},
                "Results": [{"position": "4", "points": "12", "grid": "2", "status": "Finished",
                    "Driver": {"driverId": "leclerc", "givenName": "Charles", "familyName": "Leclerc"}}]},
            {"round": "2", "raceName": "Saudi Arabian Grand Prix", "date": "2024-03-09",
                "Circuit": {"circuitId": "jeddah", "circuitName": "Jeddah", "Location": {}},
                "Results": []}
        ]}}}));

        let results = normalize_driver_results(data);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].race, "Bahrain Grand Prix");
        assert_eq!(results[0].position, 4);
        assert_eq!(results[0].points, 12.0);
    }
}
