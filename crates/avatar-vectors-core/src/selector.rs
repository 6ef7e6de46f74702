//! Forced-variant selectors.
//!
//! A [`PartSelector`] pins the character part and palette, bypassing the
//! hash-derived choice. The harness echoes selectors verbatim and never
//! validates the part code; rejecting unknown codes is the algorithm's job.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The 16 character part codes known to the reference algorithm.
pub const PART_CODES: [&str; 16] = [
    "00", "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "13", "14",
    "15",
];

/// Display names of the characters, indexed like [`PART_CODES`].
pub const CHARACTER_NAMES: [&str; 16] = [
    "Robo",
    "Girl",
    "Blonde",
    "Guy",
    "Country",
    "Geeknot",
    "Asian",
    "Punk",
    "Afrohair",
    "Normie Female",
    "Older",
    "Firehair",
    "Blond",
    "Ateam",
    "Rasta",
    "Street",
];

/// Palette selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Theme {
    A,
    B,
    C,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::A, Theme::B, Theme::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::A => "A",
            Theme::B => "B",
            Theme::C => "C",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forced character part plus theme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartSelector {
    /// Two-digit part code, `"00"` to `"15"` for known characters.
    pub part: String,
    pub theme: Theme,
}

impl PartSelector {
    pub fn new(part: impl Into<String>, theme: Theme) -> Self {
        PartSelector {
            part: part.into(),
            theme,
        }
    }

    /// Whether the part code is one of [`PART_CODES`].
    pub fn is_known_part(&self) -> bool {
        PART_CODES.contains(&self.part.as_str())
    }

    /// Character name for a known part code.
    pub fn character_name(&self) -> Option<&'static str> {
        PART_CODES
            .iter()
            .position(|code| *code == self.part)
            .map(|idx| CHARACTER_NAMES[idx])
    }
}

impl fmt::Display for PartSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.part, self.theme)
    }
}
