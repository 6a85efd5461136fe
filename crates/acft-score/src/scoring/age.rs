use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ScoringError;

/// Age groups used as standards table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "17-21")]
    From17To21,
    #[serde(rename = "22-26")]
    From22To26,
    #[serde(rename = "27-31")]
    From27To31,
    #[serde(rename = "32-36")]
    From32To36,
    #[serde(rename = "37-41")]
    From37To41,
    #[serde(rename = "42-46")]
    From42To46,
    #[serde(rename = "47-51")]
    From47To51,
    #[serde(rename = "52-56")]
    From52To56,
    #[serde(rename = "57-61")]
    From57To61,
    #[serde(rename = "62+")]
    From62,
}

/// Inclusive bounds for each bracket, youngest first.
const BRACKETS: [(u32, u32, AgeBracket); 10] = [
    (17, 21, AgeBracket::From17To21),
    (22, 26, AgeBracket::From22To26),
    (27, 31, AgeBracket::From27To31),
    (32, 36, AgeBracket::From32To36),
    (37, 41, AgeBracket::From37To41),
    (42, 46, AgeBracket::From42To46),
    (47, 51, AgeBracket::From47To51),
    (52, 56, AgeBracket::From52To56),
    (57, 61, AgeBracket::From57To61),
    (62, 75, AgeBracket::From62),
];

pub const MIN_AGE: u32 = 17;
pub const MAX_AGE: u32 = 75;

impl AgeBracket {
    pub const ALL: [AgeBracket; 10] = [
        AgeBracket::From17To21,
        AgeBracket::From22To26,
        AgeBracket::From27To31,
        AgeBracket::From32To36,
        AgeBracket::From37To41,
        AgeBracket::From42To46,
        AgeBracket::From47To51,
        AgeBracket::From52To56,
        AgeBracket::From57To61,
        AgeBracket::From62,
    ];

    pub fn classify(age: u32) -> Result<Self, ScoringError> {
        BRACKETS
            .iter()
            .find(|(low, high, _)| (*low..=*high).contains(&age))
            .map(|(_, _, bracket)| *bracket)
            .ok_or(ScoringError::InvalidAge(age))
    }

    /// Column header used by the standards tables.
    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::From17To21 => "17-21",
            AgeBracket::From22To26 => "22-26",
            AgeBracket::From27To31 => "27-31",
            AgeBracket::From32To36 => "32-36",
            AgeBracket::From37To41 => "37-41",
            AgeBracket::From42To46 => "42-46",
            AgeBracket::From47To51 => "47-51",
            AgeBracket::From52To56 => "52-56",
            AgeBracket::From57To61 => "57-61",
            AgeBracket::From62 => "62+",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
