use std::collections::BTreeMap;
use std::io::Read;

use super::age::AgeBracket;
use super::error::ScoringError;
use super::event::{Event, EventKind, Sex};
use super::time::parse_seconds;

/// Cell marker for a point tier that has no raw threshold in a given bracket.
pub const UNRANKED_MARKER: &str = "---";

const POINTS_HEADER: &str = "Points";

/// A single raw threshold cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Ranked(f64),
    Unranked,
}

impl Threshold {
    pub fn value(&self) -> Option<f64> {
        match self {
            Threshold::Ranked(value) => Some(*value),
            Threshold::Unranked => None,
        }
    }
}

/// Standards for one event and sex, rows ordered from best to worst performance.
///
/// Every bracket column has one cell per row of the shared `points` column.
#[derive(Debug, Clone)]
pub struct StandardsTable {
    event: Event,
    sex: Sex,
    points: Vec<i32>,
    columns: BTreeMap<AgeBracket, Vec<Threshold>>,
}

/// Borrowed view of one bracket's thresholds next to the points column.
#[derive(Debug, Clone, Copy)]
pub struct StandardsColumn<'a> {
    pub bracket: AgeBracket,
    thresholds: &'a [Threshold],
    points: &'a [i32],
}

impl<'a> StandardsColumn<'a> {
    pub fn thresholds(&self) -> &'a [Threshold] {
        self.thresholds
    }

    pub fn points(&self) -> &'a [i32] {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl StandardsTable {
    /// Reads a CSV resource with a `Points` column and one column per age bracket.
    pub fn from_reader<R: Read>(
        event: Event,
        sex: Sex,
        resource: &str,
        reader: R,
    ) -> Result<Self, ScoringError> {
        let csv_error = |source| ScoringError::Csv {
            resource: resource.to_string(),
            source,
        };
        let malformed = |detail: String| ScoringError::MalformedTable {
            resource: resource.to_string(),
            detail,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers().map_err(csv_error)?.clone();

        let points_index = headers
            .iter()
            .position(|header| header == POINTS_HEADER)
            .ok_or_else(|| malformed(format!("missing '{POINTS_HEADER}' column")))?;
        let mut bracket_indices = Vec::with_capacity(AgeBracket::ALL.len());
        for bracket in AgeBracket::ALL {
            let index = headers
                .iter()
                .position(|header| header == bracket.label())
                .ok_or_else(|| malformed(format!("missing '{}' column", bracket.label())))?;
            bracket_indices.push((bracket, index));
        }

        let mut points = Vec::new();
        let mut columns: BTreeMap<AgeBracket, Vec<Threshold>> = BTreeMap::new();

        for (row, record) in csv_reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            let cell = |index: usize| record.get(index).unwrap_or_default();

            let raw_points = cell(points_index);
            let value = raw_points.parse::<i32>().map_err(|_| {
                malformed(format!("row {row}: points '{raw_points}' is not an integer"))
            })?;
            points.push(value);

            for (bracket, index) in &bracket_indices {
                let threshold = parse_cell(event.kind(), cell(*index))
                    .map_err(|detail| malformed(format!("row {row}, {}: {detail}", bracket)))?;
                columns.entry(*bracket).or_default().push(threshold);
            }
        }

        if points.is_empty() {
            return Err(malformed("table has no rows".to_string()));
        }
        if let Some(row) = points.windows(2).position(|pair| pair[1] > pair[0]) {
            return Err(malformed(format!(
                "points increase between rows {row} and {}",
                row + 1
            )));
        }

        Ok(Self {
            event,
            sex,
            points,
            columns,
        })
    }

    pub fn event(&self) -> Event {
        self.event
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_points(&self) -> i32 {
        self.points.first().copied().unwrap_or_default()
    }

    pub fn min_points(&self) -> i32 {
        self.points.last().copied().unwrap_or_default()
    }

    pub fn column(&self, bracket: AgeBracket) -> Option<StandardsColumn<'_>> {
        self.columns.get(&bracket).map(|thresholds| StandardsColumn {
            bracket,
            thresholds,
            points: &self.points,
        })
    }
}

fn parse_cell(kind: EventKind, cell: &str) -> Result<Threshold, String> {
    let cell = cell.trim();
    if cell.is_empty() || cell == UNRANKED_MARKER {
        return Ok(Threshold::Unranked);
    }

    if kind == EventKind::Timed && cell.contains(':') {
        return parse_seconds(cell)
            .map(|seconds| Threshold::Ranked(f64::from(seconds)))
            .map_err(|err| err.to_string());
    }

    cell.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(Threshold::Ranked)
        .ok_or_else(|| format!("cell '{cell}' is neither a number nor '{UNRANKED_MARKER}'"))
}
