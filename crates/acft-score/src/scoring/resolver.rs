use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::age::AgeBracket;
use super::error::ScoringError;
use super::event::{Direction, Event, EventKind, Sex};
use super::loader::TableLoader;
use super::table::{StandardsColumn, Threshold};
use super::time::parse_seconds;

/// Raw values closer than this to a threshold count as an exact match.
pub const EXACT_TOLERANCE: f64 = 1e-6;

/// A raw result as supplied by a caller: a number, or text such as `"1:45"` or `"12.5"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    Number(f64),
    Text(String),
}

impl RawInput {
    /// Converts the input to the unit the event's table uses. Timed events yield seconds.
    ///
    /// Counts and distances must not be negative; times must be positive.
    pub fn measure(&self, event: Event) -> Result<f64, ScoringError> {
        let value = match (self, event.kind()) {
            (RawInput::Number(value), _) => *value,
            (RawInput::Text(text), EventKind::Timed) => f64::from(parse_seconds(text)?),
            (RawInput::Text(text), EventKind::Numeric) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| ScoringError::MalformedNumber(text.clone()))?,
        };

        match event.kind() {
            EventKind::Timed if value <= 0.0 => Err(ScoringError::MalformedTime(self.to_string())),
            EventKind::Numeric if value < 0.0 => {
                Err(ScoringError::MalformedNumber(self.to_string()))
            }
            _ => Ok(value),
        }
    }
}

impl fmt::Display for RawInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawInput::Number(value) => write!(f, "{value}"),
            RawInput::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for RawInput {
    fn from(value: f64) -> Self {
        RawInput::Number(value)
    }
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Text(value.to_string())
    }
}

/// Which rule produced the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Exact,
    ExceededStandard,
    BelowMinimum,
    RoundedDown,
}

/// Row chosen for a raw value within one bracket column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub points: i32,
    pub resolution: Resolution,
}

/// Points awarded for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventScore {
    pub event: Event,
    pub bracket: AgeBracket,
    /// Raw value in table units; seconds for timed events.
    pub value: f64,
    pub points: i32,
    pub resolution: Resolution,
}

/// Places `raw` within a column.
///
/// An exact threshold match wins first. Otherwise a value better than the best ranked
/// threshold earns row 0, one worse than the worst ranked threshold earns the last row,
/// and anything in between earns the first ranked row it beats, i.e. the next-worse
/// standard. Unranked cells are never matched. `None` means the column has no ranked
/// cells or `raw` is not finite.
pub fn place(column: StandardsColumn<'_>, direction: Direction, raw: f64) -> Option<Placement> {
    if !raw.is_finite() || column.is_empty() {
        return None;
    }

    let thresholds = column.thresholds();
    let points = column.points();
    let at = |row: usize, resolution: Resolution| Placement {
        row,
        points: points[row],
        resolution,
    };

    if let Some(row) = thresholds.iter().position(|threshold| {
        threshold
            .value()
            .is_some_and(|value| (value - raw).abs() <= EXACT_TOLERANCE)
    }) {
        return Some(at(row, Resolution::Exact));
    }

    let best = thresholds.iter().find_map(Threshold::value)?;
    let worst = thresholds.iter().rev().find_map(Threshold::value)?;

    if direction.is_better(raw, best) {
        return Some(at(0, Resolution::ExceededStandard));
    }
    if direction.is_better(worst, raw) {
        return Some(at(thresholds.len() - 1, Resolution::BelowMinimum));
    }

    thresholds
        .iter()
        .position(|threshold| {
            threshold
                .value()
                .is_some_and(|value| direction.is_better(raw, value))
        })
        .map(|row| at(row, Resolution::RoundedDown))
}

/// Looks up the table and bracket for a result and converts it to points.
pub struct ScoreResolver<L> {
    loader: Arc<L>,
}

impl<L> Clone for ScoreResolver<L> {
    fn clone(&self) -> Self {
        Self {
            loader: Arc::clone(&self.loader),
        }
    }
}

impl<L: TableLoader> ScoreResolver<L> {
    pub fn new(loader: Arc<L>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Arc<L> {
        &self.loader
    }

    /// Scores a raw value already expressed in table units.
    pub fn resolve(
        &self,
        event: Event,
        age: u32,
        sex: Sex,
        raw: f64,
    ) -> Result<EventScore, ScoringError> {
        let bracket = AgeBracket::classify(age)?;
        let table = self.loader.load(event, sex)?;
        let column = table
            .column(bracket)
            .ok_or_else(|| ScoringError::MalformedTable {
                resource: format!("{event}_{sex}"),
                detail: format!("no column for bracket {bracket}"),
            })?;

        let placement = place(column, event.direction(), raw)
            .ok_or(ScoringError::RawScoreOutOfDomain { event, raw })?;

        debug!(
            %event,
            %sex,
            %bracket,
            raw,
            row = placement.row,
            points = placement.points,
            resolution = ?placement.resolution,
            "event resolved"
        );

        Ok(EventScore {
            event,
            bracket,
            value: raw,
            points: placement.points,
            resolution: placement.resolution,
        })
    }

    /// Scores caller input, parsing times for timed events first.
    pub fn resolve_input(
        &self,
        event: Event,
        age: u32,
        sex: Sex,
        input: &RawInput,
    ) -> Result<EventScore, ScoringError> {
        let raw = input.measure(event)?;
        self.resolve(event, age, sex, raw)
    }
}
