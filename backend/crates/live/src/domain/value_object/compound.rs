use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TyreCompound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl TyreCompound {
    /// Upstream spelling is inconsistent in case and occasionally abbreviated.
    pub fn from_upstream(raw: &str) -> Self {
        use TyreCompound::*;
        match raw.trim().to_ascii_uppercase().as_str() {
            "SOFT" | "S" => Soft,
            "MEDIUM" | "M" => Medium,
            "HARD" | "H" => Hard,
            "INTERMEDIATE" | "INTER" | "I" => Intermediate,
            "WET" | "W" => Wet,
            _ => Unknown,
        }
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use TyreCompound::*;
        match self {
            Soft => "SOFT",
            Medium => "MEDIUM",
            Hard => "HARD",
            Intermediate => "INTERMEDIATE",
            Wet => "WET",
            Unknown => "UNKNOWN",
        }
    }

    /// Display colour used by the rendering layer
    #[inline]
    pub const fn colour(&self) -> &'static str {
        use TyreCompound::*;
        match self {
            Soft => "#FF3333",
            Medium => "#FFD700",
            Hard => "#CCCCCC",
            Intermediate => "#39B54A",
            Wet => "#0067FF",
            Unknown => "#888888",
        }
    }
}

impl fmt::Display for TyreCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
