use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ScoringError;

/// The six scored events, in test order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Event {
    #[serde(rename = "DL", alias = "dl")]
    Deadlift,
    #[serde(rename = "SPT", alias = "spt")]
    StandingPowerThrow,
    #[serde(rename = "HRP", alias = "hrp")]
    HandReleasePushup,
    #[serde(rename = "SDC", alias = "sdc")]
    SprintDragCarry,
    #[serde(rename = "PLK", alias = "plk")]
    Plank,
    #[serde(rename = "2MR", alias = "2mr")]
    TwoMileRun,
}

/// How the raw result is written down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Pounds, meters or repetitions.
    Numeric,
    /// A `M:SS` duration.
    Timed,
}

/// Which way along the raw axis a performance improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    /// Whether `candidate` is a strictly better performance than `reference`.
    pub fn is_better(self, candidate: f64, reference: f64) -> bool {
        match self {
            Direction::HigherIsBetter => candidate > reference,
            Direction::LowerIsBetter => candidate < reference,
        }
    }
}

impl Event {
    pub const ALL: [Event; 6] = [
        Event::Deadlift,
        Event::StandingPowerThrow,
        Event::HandReleasePushup,
        Event::SprintDragCarry,
        Event::Plank,
        Event::TwoMileRun,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Event::Deadlift => "DL",
            Event::StandingPowerThrow => "SPT",
            Event::HandReleasePushup => "HRP",
            Event::SprintDragCarry => "SDC",
            Event::Plank => "PLK",
            Event::TwoMileRun => "2MR",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Event::Deadlift => "3 Repetition Maximum Deadlift",
            Event::StandingPowerThrow => "Standing Power Throw",
            Event::HandReleasePushup => "Hand-Release Push-Up",
            Event::SprintDragCarry => "Sprint-Drag-Carry",
            Event::Plank => "Plank",
            Event::TwoMileRun => "Two-Mile Run",
        }
    }

    pub fn kind(self) -> EventKind {
        match self {
            Event::Deadlift | Event::StandingPowerThrow | Event::HandReleasePushup => {
                EventKind::Numeric
            }
            Event::SprintDragCarry | Event::Plank | Event::TwoMileRun => EventKind::Timed,
        }
    }

    /// The plank is timed but scored on time held, so longer is better.
    pub fn direction(self) -> Direction {
        match self {
            Event::SprintDragCarry | Event::TwoMileRun => Direction::LowerIsBetter,
            Event::Deadlift
            | Event::StandingPowerThrow
            | Event::HandReleasePushup
            | Event::Plank => Direction::HigherIsBetter,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Event {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Event::ALL
            .into_iter()
            .find(|event| event.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ScoringError::UnknownEventOrSex(value.to_string()))
    }
}

/// Selects the male or female table variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M", alias = "m", alias = "male")]
    Male,
    #[serde(rename = "F", alias = "f", alias = "female")]
    Female,
}

impl Sex {
    pub fn code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Sex {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Sex::Male),
            "f" | "female" => Ok(Sex::Female),
            _ => Err(ScoringError::UnknownEventOrSex(value.to_string())),
        }
    }
}
