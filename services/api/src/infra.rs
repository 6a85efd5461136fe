use acft_score::scorecard::{HistoryError, ScoreHistory, ScoreRecord};
use acft_score::scoring::{CachedTableLoader, Event, Sex, StandardsSource};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) type Tables = CachedTableLoader<StandardsSource>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) tables: Arc<Tables>,
}

/// Process-local history keyed by username, each list kept in date order. Lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreHistory {
    records: Arc<Mutex<HashMap<String, Vec<ScoreRecord>>>>,
}

impl ScoreHistory for InMemoryScoreHistory {
    fn append(&self, record: ScoreRecord) -> Result<(), HistoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| HistoryError::Unavailable("history mutex poisoned".to_string()))?;
        let records = guard.entry(record.username.clone()).or_default();
        let at = records.partition_point(|existing| existing.date <= record.date);
        records.insert(at, record);
        Ok(())
    }

    fn for_user(&self, username: &str) -> Result<Vec<ScoreRecord>, HistoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| HistoryError::Unavailable("history mutex poisoned".to_string()))?;
        Ok(guard.get(username).cloned().unwrap_or_default())
    }
}

pub(crate) fn parse_event(raw: &str) -> Result<Event, String> {
    raw.parse::<Event>().map_err(|err| err.to_string())
}

pub(crate) fn parse_sex(raw: &str) -> Result<Sex, String> {
    raw.parse::<Sex>().map_err(|err| err.to_string())
}
