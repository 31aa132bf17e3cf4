//! Constructor Colours
//!
//! Keyed by the provider's stable constructor id, since display names change
//! with sponsorship.

const CONSTRUCTOR_COLOURS: &[(&str, &str)] = &[
    ("red_bull", "#3671C6"),
    ("mercedes", "#27F4D2"),
    ("ferrari", "#E8002D"),
    ("mclaren", "#FF8000"),
    ("aston_martin", "#229971"),
    ("alpine", "#FF87BC"),
    ("williams", "#64C4FF"),
    ("haas", "#B6BABD"),
    ("rb", "#6692FF"),
    ("sauber", "#52E252"),
];

pub const DEFAULT_COLOUR: &str = "#888888";

pub fn colour(constructor_id: &str) -> &'static str {
    CONSTRUCTOR_COLOURS
        .iter()
        .find(|(id, _)| *id == constructor_id)
        .map(|(_, colour)| *colour)
        .unwrap_or(DEFAULT_COLOUR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown() {
        assert_eq!(colour("ferrari"), "#E8002D");
        assert_eq!(colour("brawn"), DEFAULT_COLOUR);
    }
}
