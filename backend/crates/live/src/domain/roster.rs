//! Driver Roster
//!
//! Static enrichment data for car numbers. The live feeds only carry numbers;
//! names, codes and team colours come from here.

use crate::domain::value_object::CarNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterEntry {
    pub number: u32,
    pub code: &'static str,
    pub name: &'static str,
    pub team: &'static str,
    pub country: &'static str,
}

const fn entry(
    number: u32,
    code: &'static str,
    name: &'static str,
    team: &'static str,
    country: &'static str,
) -> RosterEntry {
    RosterEntry {
        number,
        code,
        name,
        team,
        country,
    }
}

/// Current grid, in championship order of the teams
pub const ROSTER: &[RosterEntry] = &[
    entry(1, "VER", "Max Verstappen", "Red Bull Racing", "NL"),
    entry(30, "LAW", "Liam Lawson", "Red Bull Racing", "NZ"),
    entry(44, "HAM", "Lewis Hamilton", "Ferrari", "GB"),
    entry(16, "LEC", "Charles Leclerc", "Ferrari", "MC"),
    entry(4, "NOR", "Lando Norris", "McLaren", "GB"),
    entry(81, "PIA", "Oscar Piastri", "McLaren", "AU"),
    entry(63, "RUS", "George Russell", "Mercedes", "GB"),
    entry(12, "ANT", "Andrea Kimi Antonelli", "Mercedes", "IT"),
    entry(14, "ALO", "Fernando Alonso", "Aston Martin", "ES"),
    entry(18, "STR", "Lance Stroll", "Aston Martin", "CA"),
    entry(10, "GAS", "Pierre Gasly", "Alpine", "FR"),
    entry(7, "DOO", "Jack Doohan", "Alpine", "AU"),
    entry(23, "ALB", "Alexander Albon", "Williams", "TH"),
    entry(55, "SAI", "Carlos Sainz", "Williams", "ES"),
    entry(31, "OCO", "Esteban Ocon", "Haas F1 Team", "FR"),
    entry(87, "BEA", "Oliver Bearman", "Haas F1 Team", "GB"),
    entry(22, "TSU", "Yuki Tsunoda", "RB", "JP"),
    entry(6, "HAD", "Isack Hadjar", "RB", "FR"),
    entry(27, "HUL", "Nico Hülkenberg", "Kick Sauber", "DE"),
    entry(5, "BOR", "Gabriel Bortoleto", "Kick Sauber", "BR"),
];

const TEAM_COLOURS: &[(&str, &str)] = &[
    ("Red Bull Racing", "#3671C6"),
    ("Mercedes", "#27F4D2"),
    ("Ferrari", "#E8002D"),
    ("McLaren", "#FF8000"),
    ("Aston Martin", "#229971"),
    ("Alpine", "#FF87BC"),
    ("Williams", "#64C4FF"),
    ("Haas F1 Team", "#B6BABD"),
    ("RB", "#6692FF"),
    ("Kick Sauber", "#52E252"),
];

pub const DEFAULT_TEAM_COLOUR: &str = "#888888";

pub fn lookup(car: CarNumber) -> Option<&'static RosterEntry> {
    ROSTER.iter().find(|e| e.number == car.get())
}

pub fn team_colour(team: &str) -> &'static str {
    TEAM_COLOURS
        .iter()
        .find(|(name, _)| *name == team)
        .map(|(_, colour)| *colour)
        .unwrap_or(DEFAULT_TEAM_COLOUR)
}

/// Display fields for a car, with placeholders for numbers not on the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub code: String,
    pub name: String,
    pub team: String,
    pub team_colour: String,
}

pub fn enrich(car: CarNumber) -> Enrichment {
    match lookup(car) {
        Some(e) => Enrichment {
            code: e.code.to_string(),
            name: e.name.to_string(),
            team: e.team.to_string(),
            team_colour: team_colour(e.team).to_string(),
        },
        None => Enrichment {
            code: car.to_string(),
            name: format!("Car {}", car),
            team: String::new(),
            team_colour: DEFAULT_TEAM_COLOUR.to_string(),
        },
    }
}
