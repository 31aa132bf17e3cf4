//! Race-Control Translator
//!
//! Maps upstream race-control text to the display vocabulary. Rules are tried
//! in a fixed order: exact phrases first, then anchored patterns. Text no rule
//! knows passes through unchanged and is counted so new phrasings can be added.
//!
//! Upstream text is upper case; every rendered output is sentence case, so a
//! translated message never matches a rule again and translation is
//! idempotent.

use crate::domain::entity::RaceControlCategory::{self, Flag, Other, Penalty, SafetyCar};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Rule name reported for exact-phrase matches
pub const EXACT_RULE: &str = "exact";

const EXACT_PHRASES: [(&str, &str, RaceControlCategory); 14] = [
    ("GREEN LIGHT - PIT EXIT OPEN", "Green light: pit exit open", Flag),
    ("PIT EXIT CLOSED", "Pit exit closed", Other),
    ("PIT ENTRY CLOSED", "Pit entry closed", Other),
    ("DRS ENABLED", "DRS enabled", Other),
    ("DRS DISABLED", "DRS disabled", Other),
    ("SAFETY CAR DEPLOYED", "Safety car deployed", SafetyCar),
    ("SAFETY CAR IN THIS LAP", "Safety car in this lap", SafetyCar),
    ("VIRTUAL SAFETY CAR DEPLOYED", "Virtual safety car deployed", SafetyCar),
    ("VIRTUAL SAFETY CAR ENDING", "Virtual safety car ending", SafetyCar),
    (
        "RACE WILL START BEHIND THE SAFETY CAR",
        "Race will start behind the safety car",
        SafetyCar,
    ),
    ("LAPPED CARS MAY NOW OVERTAKE", "Lapped cars may now overtake", SafetyCar),
    ("RED FLAG", "Red flag: session suspended", Flag),
    ("CHEQUERED FLAG", "Chequered flag", Flag),
    ("TRACK CLEAR", "Track clear", Flag),
];

/// (name, pattern, template, category), evaluated top to bottom
const PATTERN_RULES: [(&str, &str, &str, RaceControlCategory); 24] = [
    (
        "time_penalty",
        r"^CAR (?P<car>\d+)(?: \((?P<code>[A-Z]{3})\))? TIME PENALTY (?P<secs>\d+) ?(?:S|s|SEC|SECS|SECONDS)$",
        "Car {car}: {secs}s time penalty",
        Penalty,
    ),
    (
        "stewards_time_penalty",
        r"^FIA STEWARDS: (?P<secs>\d+) SECOND TIME PENALTY FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) - (?P<reason>.+)$",
        "Car {car} ({code}): {secs}s time penalty for {reason|lower}",
        Penalty,
    ),
    (
        "drive_through",
        r"^FIA STEWARDS: DRIVE THROUGH PENALTY FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) - (?P<reason>.+)$",
        "Car {car} ({code}): drive-through penalty for {reason|lower}",
        Penalty,
    ),
    (
        "stop_go",
        r"^FIA STEWARDS: (?P<secs>\d+) SECOND STOP/GO PENALTY FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) - (?P<reason>.+)$",
        "Car {car} ({code}): {secs}s stop/go penalty for {reason|lower}",
        Penalty,
    ),
    (
        "grid_penalty",
        r"^FIA STEWARDS: (?P<places>\d+) PLACE GRID PENALTY FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) - (?P<reason>.+)$",
        "Car {car} ({code}): {places}-place grid penalty for {reason|lower}",
        Penalty,
    ),
    (
        "reprimand",
        r"^FIA STEWARDS: REPRIMAND \((?P<kind>[A-Z ]+)\) FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) - (?P<reason>.+)$",
        "Car {car} ({code}): {kind|lower} reprimand for {reason|lower}",
        Penalty,
    ),
    (
        "penalty_served",
        r"^FIA STEWARDS: PENALTY SERVED - (?P<penalty>.+?) FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\)(?: - .+)?$",
        "Car {car} ({code}): {penalty|lower} served",
        Penalty,
    ),
    (
        "incident_noted",
        r"^FIA STEWARDS: (?P<incident>.+) NOTED - (?P<reason>.+)$",
        "Incident noted: {incident|lower} ({reason|lower})",
        Other,
    ),
    (
        "under_investigation",
        r"^FIA STEWARDS: (?P<incident>.+) UNDER INVESTIGATION - (?P<reason>.+)$",
        "Under investigation: {incident|lower} ({reason|lower})",
        Other,
    ),
    (
        "no_further_action",
        r"^FIA STEWARDS: (?P<incident>.+) REVIEWED NO FURTHER (?:INVESTIGATION|ACTION)$",
        "No further action: {incident|lower}",
        Other,
    ),
    (
        "investigated_after",
        r"^FIA STEWARDS: (?P<incident>.+) WILL BE INVESTIGATED AFTER THE (?P<when>RACE|SESSION)(?: - (?P<reason>.+))?$",
        "To be investigated after the {when|lower}: {incident|lower}",
        Other,
    ),
    (
        "track_limits_deleted",
        r"^CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) TIME (?P<time>\d+:\d{2}\.\d{3}) DELETED - TRACK LIMITS AT TURN (?P<turn>\d+) LAP (?P<lap>\d+) (?P<clock>\d{2}:\d{2}:\d{2})$",
        "Car {car} ({code}): lap {lap} time {time} deleted, track limits at turn {turn}",
        Penalty,
    ),
    (
        "time_deleted",
        r"^CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) (?:LAP )?TIME (?P<time>\d+:\d{2}\.\d{3}) DELETED - (?P<reason>.+)$",
        "Car {car} ({code}): time {time} deleted, {reason|lower}",
        Penalty,
    ),
    (
        "black_white_flag",
        r"^BLACK AND WHITE FLAG FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) - (?P<reason>.+)$",
        "Black and white flag for car {car} ({code}): {reason|lower}",
        Flag,
    ),
    (
        "black_orange_flag",
        r"^BLACK AND ORANGE FLAG FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\)(?: - .+)?$",
        "Black and orange flag for car {car} ({code})",
        Flag,
    ),
    (
        "blue_flag",
        r"^WAVED BLUE FLAG FOR CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) TIMED AT (?P<clock>\d{2}:\d{2}:\d{2})$",
        "Blue flag for car {car} ({code}) at {clock}",
        Flag,
    ),
    (
        "yellow_sector",
        r"^YELLOW IN TRACK SECTOR (?P<sector>\d+)$",
        "Yellow flag in sector {sector}",
        Flag,
    ),
    (
        "double_yellow_sector",
        r"^DOUBLE YELLOW IN TRACK SECTOR (?P<sector>\d+)$",
        "Double yellow flag in sector {sector}",
        Flag,
    ),
    (
        "clear_sector",
        r"^CLEAR IN TRACK SECTOR (?P<sector>\d+)$",
        "Sector {sector} clear",
        Flag,
    ),
    (
        "slippery_sector",
        r"^SLIPPERY SURFACE IN TRACK SECTOR (?P<sector>\d+)$",
        "Slippery surface in sector {sector}",
        Flag,
    ),
    (
        "car_stopped",
        r"^CAR (?P<car>\d+) \((?P<code>[A-Z]{3})\) STOPPED(?: ON TRACK)? (?:AT|IN) (?P<place>.+)$",
        "Car {car} ({code}) stopped at {place|lower}",
        Other,
    ),
    (
        "rain_risk",
        r"^RISK OF RAIN FOR F1 (?P<session>RACE|SPRINT|QUALIFYING|SESSION) IS (?P<pct>\d+)%$",
        "Risk of rain for the {session|lower}: {pct}%",
        Other,
    ),
    (
        "session_resume",
        r"^(?P<session>[A-Z0-9 ]+?) WILL RESUME AT (?P<clock>\d{2}:\d{2})(?::\d{2})?$",
        "{session|capitalize} will resume at {clock}",
        Other,
    ),
    (
        "session_start",
        r"^(?P<session>[A-Z0-9 ]+?) WILL START AT (?P<clock>\d{2}:\d{2})(?::\d{2})?$",
        "{session|capitalize} will start at {clock}",
        Other,
    ),
];

struct PatternRule {
    name: &'static str,
    matcher: Regex,
    template: &'static str,
    category: RaceControlCategory,
}

static EXACT: LazyLock<HashMap<&'static str, (&'static str, RaceControlCategory)>> =
    LazyLock::new(|| {
        EXACT_PHRASES
            .iter()
            .map(|&(raw, text, category)| (raw, (text, category)))
            .collect()
    });

static PATTERNS: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    PATTERN_RULES
        .iter()
        .map(|&(name, pattern, template, category)| PatternRule {
            name,
            matcher: Regex::new(pattern).expect("valid regex literal"),
            template,
            category,
        })
        .collect()
});

static TEMPLATE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(?P<field>[a-z_]+)(?:\|(?P<filter>[a-z]+))?\}").expect("valid regex literal")
});

/// Outcome of translating one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Translated {
        text: String,
        rule: &'static str,
        category: RaceControlCategory,
    },
    /// No rule matched; the raw text is used as is
    Passthrough,
}

impl Translation {
    /// Display text, falling back to `raw` on passthrough.
    pub fn text_or<'a>(&'a self, raw: &'a str) -> &'a str {
        match self {
            Translation::Translated { text, .. } => text,
            Translation::Passthrough => raw,
        }
    }

    pub fn rule(&self) -> Option<&'static str> {
        match self {
            Translation::Translated { rule, .. } => Some(rule),
            Translation::Passthrough => None,
        }
    }
}

/// Translate `raw` against the rule table. Pure; see [`RaceControlTranslator`]
/// for the counting wrapper.
pub fn translate(raw: &str) -> Translation {
    let raw = raw.trim();
    if let Some(&(text, category)) = EXACT.get(raw) {
        return Translation::Translated {
            text: text.to_string(),
            rule: EXACT_RULE,
            category,
        };
    }

    PATTERNS
        .iter()
        .find_map(|rule| {
            rule.matcher.captures(raw).map(|caps| Translation::Translated {
                text: render(rule.template, &caps),
                rule: rule.name,
                category: rule.category,
            })
        })
        .unwrap_or(Translation::Passthrough)
}

/// Convenience form returning only the display text.
pub fn normalize_text(raw: &str) -> String {
    translate(raw).text_or(raw).to_string()
}

fn render(template: &str, caps: &Captures<'_>) -> String {
    TEMPLATE_FIELD
        .replace_all(template, |field: &Captures<'_>| {
            let value = caps.name(&field["field"]).map_or("", |m| m.as_str());
            match field.name("filter").map(|m| m.as_str()) {
                Some("lower") => lower_outside_parens(value),
                Some("capitalize") => capitalize(value),
                _ => value.to_string(),
            }
        })
        .into_owned()
}

/// Lower-case everything except parenthesised driver codes such as `(VER)`.
fn lower_outside_parens(text: &str) -> String {
    let mut depth = 0usize;
    text.chars()
        .map(|c| {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
            if depth == 0 { c.to_ascii_lowercase() } else { c }
        })
        .collect()
}

fn capitalize(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Translator handle that counts passthroughs for the health endpoint
#[derive(Debug, Default)]
pub struct RaceControlTranslator {
    misses: AtomicU64,
}

impl RaceControlTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&self, raw: &str) -> Translation {
        let translation = translate(raw);
        if translation == Translation::Passthrough {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(raw, "No race-control rule matched");
        }
        translation
    }

    /// Messages that passed through untranslated since startup
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translated(raw: &str) -> (String, &'static str, RaceControlCategory) {
        match translate(raw) {
            Translation::Translated {
                text,
                rule,
                category,
            } => (text, rule, category),
            Translation::Passthrough => panic!("no rule for {raw:?}"),
        }
    }

    /// One sample per pattern rule, in rule order.
    const PATTERN_SAMPLES: [(&str, &str); 24] = [
        ("CAR 44 TIME PENALTY 5s", "Car 44: 5s time penalty"),
        (
            "FIA STEWARDS: 5 SECOND TIME PENALTY FOR CAR 4 (NOR) - CAUSING A COLLISION",
            "Car 4 (NOR): 5s time penalty for causing a collision",
        ),
        (
            "FIA STEWARDS: DRIVE THROUGH PENALTY FOR CAR 18 (STR) - SPEEDING IN THE PIT LANE",
            "Car 18 (STR): drive-through penalty for speeding in the pit lane",
        ),
        (
            "FIA STEWARDS: 10 SECOND STOP/GO PENALTY FOR CAR 22 (TSU) - UNSAFE RELEASE",
            "Car 22 (TSU): 10s stop/go penalty for unsafe release",
        ),
        (
            "FIA STEWARDS: 3 PLACE GRID PENALTY FOR CAR 55 (SAI) - IMPEDING CAR 1 (VER)",
            "Car 55 (SAI): 3-place grid penalty for impeding car 1 (VER)",
        ),
        (
            "FIA STEWARDS: REPRIMAND (DRIVING) FOR CAR 81 (PIA) - FAILING TO FOLLOW RACE DIRECTOR INSTRUCTIONS",
            "Car 81 (PIA): driving reprimand for failing to follow race director instructions",
        ),
        (
            "FIA STEWARDS: PENALTY SERVED - 5 SECOND TIME PENALTY FOR CAR 31 (OCO) - TRACK LIMITS",
            "Car 31 (OCO): 5 second time penalty served",
        ),
        (
            "FIA STEWARDS: LAP 1 TURN 4 INCIDENT INVOLVING CARS 1 (VER) AND 4 (NOR) NOTED - CAUSING A COLLISION",
            "Incident noted: lap 1 turn 4 incident involving cars 1 (VER) and 4 (NOR) (causing a collision)",
        ),
        (
            "FIA STEWARDS: TURN 1 INCIDENT INVOLVING CAR 63 (RUS) UNDER INVESTIGATION - FORCING ANOTHER DRIVER OFF THE TRACK",
            "Under investigation: turn 1 incident involving car 63 (RUS) (forcing another driver off the track)",
        ),
        (
            "FIA STEWARDS: PIT LANE INCIDENT INVOLVING CAR 10 (GAS) REVIEWED NO FURTHER INVESTIGATION",
            "No further action: pit lane incident involving car 10 (GAS)",
        ),
        (
            "FIA STEWARDS: LAP 12 INCIDENT INVOLVING CAR 23 (ALB) WILL BE INVESTIGATED AFTER THE RACE",
            "To be investigated after the race: lap 12 incident involving car 23 (ALB)",
        ),
        (
            "CAR 16 (LEC) TIME 1:21.345 DELETED - TRACK LIMITS AT TURN 4 LAP 7 14:22:31",
            "Car 16 (LEC): lap 7 time 1:21.345 deleted, track limits at turn 4",
        ),
        (
            "CAR 14 (ALO) LAP TIME 1:22.001 DELETED - DOUBLE YELLOW FLAGS",
            "Car 14 (ALO): time 1:22.001 deleted, double yellow flags",
        ),
        (
            "BLACK AND WHITE FLAG FOR CAR 27 (HUL) - TRACK LIMITS",
            "Black and white flag for car 27 (HUL): track limits",
        ),
        (
            "BLACK AND ORANGE FLAG FOR CAR 12 (ANT) - DAMAGED FRONT WING",
            "Black and orange flag for car 12 (ANT)",
        ),
        (
            "WAVED BLUE FLAG FOR CAR 5 (BOR) TIMED AT 14:40:02",
            "Blue flag for car 5 (BOR) at 14:40:02",
        ),
        ("YELLOW IN TRACK SECTOR 7", "Yellow flag in sector 7"),
        ("DOUBLE YELLOW IN TRACK SECTOR 12", "Double yellow flag in sector 12"),
        ("CLEAR IN TRACK SECTOR 7", "Sector 7 clear"),
        ("SLIPPERY SURFACE IN TRACK SECTOR 3", "Slippery surface in sector 3"),
        (
            "CAR 87 (BEA) STOPPED ON TRACK AT TURN 9",
            "Car 87 (BEA) stopped at turn 9",
        ),
        ("RISK OF RAIN FOR F1 RACE IS 40%", "Risk of rain for the race: 40%"),
        ("SESSION WILL RESUME AT 14:30", "Session will resume at 14:30"),
        ("FORMATION LAP WILL START AT 15:03", "Formation lap will start at 15:03"),
    ];

    #[test]
    fn test_every_exact_phrase() {
        for (raw, text, category) in EXACT_PHRASES {
            assert_eq!(translated(raw), (text.to_string(), EXACT_RULE, category));
        }
    }

    #[test]
    fn test_every_pattern_in_order() {
        for ((raw, expected), (name, ..)) in PATTERN_SAMPLES.iter().zip(PATTERN_RULES.iter()) {
            let (text, rule, _) = translated(raw);
            assert_eq!(rule, *name, "{raw}");
            assert_eq!(text, *expected, "{raw}");
        }
    }

    #[test]
    fn test_time_penalty_substitutes_fields() {
        let (text, rule, category) = translated("CAR 1 TIME PENALTY 10s");
        assert_eq!(text, "Car 1: 10s time penalty");
        assert_eq!(rule, "time_penalty");
        assert_eq!(category, RaceControlCategory::Penalty);

        assert_eq!(
            normalize_text("CAR 63 (RUS) TIME PENALTY 5 SECONDS"),
            "Car 63: 5s time penalty"
        );
    }

    #[test]
    fn test_translation_is_idempotent() {
        let raws = EXACT_PHRASES
            .iter()
            .map(|(raw, ..)| *raw)
            .chain(PATTERN_SAMPLES.iter().map(|(raw, _)| *raw))
            .chain(["BLUE FLAG OVER CAR 44", "some unknown text"]);
        for raw in raws {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "{raw}");
        }
    }

    #[test]
    fn test_exact_match_trims_whitespace() {
        assert_eq!(normalize_text("  DRS ENABLED \n"), "DRS enabled");
    }

    #[test]
    fn test_passthrough_counts_misses() {
        let translator = RaceControlTranslator::new();
        let raw = "CAR 44 (HAM) OVERTOOK UNDER YELLOW";
        assert_eq!(translator.translate(raw), Translation::Passthrough);
        assert_eq!(translator.translate(raw).text_or(raw), raw);
        assert_eq!(translator.misses(), 2);

        translator.translate("TRACK CLEAR");
        assert_eq!(translator.misses(), 2);
    }

    #[test]
    fn test_missing_optional_group_renders_empty() {
        let re = Regex::new(r"^(?P<a>X)?(?P<b>Y)$").unwrap();
        let caps = re.captures("Y").unwrap();
        assert_eq!(render("[{a}|{b}]", &caps), "[|Y]");
    }
}
