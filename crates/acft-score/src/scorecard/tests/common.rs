use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::scorecard::repository::{HistoryError, ScoreHistory, ScoreRecord};
use crate::scorecard::service::ScoringService;
use crate::scoring::{
    scorer_for, CachedTableLoader, Event, EventInputs, RawInput, StandardsSource,
};

pub(super) type EmbeddedService = ScoringService<CachedTableLoader<StandardsSource>, MemoryHistory>;

#[derive(Default)]
pub(super) struct MemoryHistory {
    pub(super) records: Mutex<Vec<ScoreRecord>>,
}

impl ScoreHistory for MemoryHistory {
    fn append(&self, record: ScoreRecord) -> Result<(), HistoryError> {
        self.records
            .lock()
            .expect("history mutex poisoned")
            .push(record);
        Ok(())
    }

    fn for_user(&self, username: &str) -> Result<Vec<ScoreRecord>, HistoryError> {
        Ok(self
            .records
            .lock()
            .expect("history mutex poisoned")
            .iter()
            .filter(|record| record.username == username)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableHistory;

impl ScoreHistory for UnavailableHistory {
    fn append(&self, _record: ScoreRecord) -> Result<(), HistoryError> {
        Err(HistoryError::Unavailable("database offline".to_string()))
    }

    fn for_user(&self, _username: &str) -> Result<Vec<ScoreRecord>, HistoryError> {
        Err(HistoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<EmbeddedService>, Arc<MemoryHistory>) {
    let history = Arc::new(MemoryHistory::default());
    let service = Arc::new(ScoringService::new(
        scorer_for(StandardsSource::Embedded(Default::default())),
        history.clone(),
    ));
    (service, history)
}

pub(super) fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid test date")
}

/// Age 25 male results that hit the 100-point row of every table.
pub(super) fn max_inputs() -> EventInputs {
    EventInputs::from([
        (Event::Deadlift, RawInput::from(340.0)),
        (Event::StandingPowerThrow, RawInput::from(13.0)),
        (Event::HandReleasePushup, RawInput::from(61.0)),
        (Event::SprintDragCarry, RawInput::from("1:40")),
        (Event::Plank, RawInput::from("3:35")),
        (Event::TwoMileRun, RawInput::from("13:30")),
    ])
}

/// Age 25 male results landing between table rows.
pub(super) fn mixed_inputs() -> EventInputs {
    EventInputs::from([
        (Event::Deadlift, RawInput::from(275.0)),
        (Event::StandingPowerThrow, RawInput::from("10.0")),
        (Event::HandReleasePushup, RawInput::from(40.0)),
        (Event::SprintDragCarry, RawInput::from("1:45")),
        (Event::Plank, RawInput::from("5:30")),
        (Event::TwoMileRun, RawInput::from("16:00")),
    ])
}
