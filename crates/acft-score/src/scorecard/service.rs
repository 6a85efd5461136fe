use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::repository::{HistoryError, ScoreHistory, ScoreRecord};
use crate::scoring::{
    CompositeError, CompositeScore, CompositeScorer, Event, EventInputs, EventScore, RawInput,
    ScoringError, Sex, TableLoader,
};

/// Composes the scoring engine with a history store.
pub struct ScoringService<L, H> {
    scorer: CompositeScorer<L>,
    history: Arc<H>,
}

impl<L, H> ScoringService<L, H>
where
    L: TableLoader + 'static,
    H: ScoreHistory + 'static,
{
    pub fn new(scorer: CompositeScorer<L>, history: Arc<H>) -> Self {
        Self { scorer, history }
    }

    pub fn score_event(
        &self,
        event: Event,
        age: u32,
        sex: Sex,
        raw: &RawInput,
    ) -> Result<EventScore, ScoringServiceError> {
        let score = self.scorer.resolver().resolve_input(event, age, sex, raw)?;
        Ok(score)
    }

    pub fn score(
        &self,
        age: u32,
        sex: Sex,
        inputs: &EventInputs,
    ) -> Result<CompositeScore, ScoringServiceError> {
        let score = self.scorer.score(age, sex, inputs)?;
        Ok(score)
    }

    /// Scores a full test and appends it to the user's history.
    ///
    /// Nothing is stored when scoring fails.
    pub fn record(
        &self,
        username: &str,
        date: NaiveDate,
        age: u32,
        sex: Sex,
        inputs: EventInputs,
    ) -> Result<(CompositeScore, ScoreRecord), ScoringServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ScoringServiceError::BlankUsername);
        }

        let score = self.scorer.score(age, sex, &inputs)?;
        let record = ScoreRecord::from_composite(date, username, age, inputs, &score);
        self.history.append(record.clone())?;

        info!(username, %date, overall = score.overall, "score recorded");
        Ok((score, record))
    }

    pub fn history(&self, username: &str) -> Result<Vec<ScoreRecord>, ScoringServiceError> {
        let records = self.history.for_user(username.trim())?;
        Ok(records)
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("username must not be blank")]
    BlankUsername,
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Composite(#[from] CompositeError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl ScoringServiceError {
    /// True when the request itself was at fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            ScoringServiceError::BlankUsername => true,
            ScoringServiceError::Scoring(err) => err.is_input_error(),
            ScoringServiceError::Composite(err) => match err.scoring_error() {
                Some(source) => source.is_input_error(),
                None => true,
            },
            ScoringServiceError::History(_) => false,
        }
    }
}
