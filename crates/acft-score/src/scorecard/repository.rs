use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::{CompositeScore, Event, EventInputs, Sex};

/// Snapshot of one completed test, as kept in a user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub date: NaiveDate,
    pub username: String,
    pub age: u32,
    pub sex: Sex,
    pub inputs: EventInputs,
    pub points: BTreeMap<Event, i32>,
    pub overall: i32,
}

impl ScoreRecord {
    pub fn from_composite(
        date: NaiveDate,
        username: impl Into<String>,
        age: u32,
        inputs: EventInputs,
        score: &CompositeScore,
    ) -> Self {
        Self {
            date,
            username: username.into(),
            age,
            sex: score.sex,
            inputs,
            points: score.points_by_event(),
            overall: score.overall,
        }
    }
}

/// Storage abstraction for score history; the engine never persists on its own.
pub trait ScoreHistory: Send + Sync {
    fn append(&self, record: ScoreRecord) -> Result<(), HistoryError>;
    /// Records for `username`, oldest first.
    fn for_user(&self, username: &str) -> Result<Vec<ScoreRecord>, HistoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("score history unavailable: {0}")]
    Unavailable(String),
}
