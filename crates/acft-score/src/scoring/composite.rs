use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::age::AgeBracket;
use super::error::ScoringError;
use super::event::{Event, Sex};
use super::loader::TableLoader;
use super::resolver::{EventScore, RawInput, ScoreResolver};

/// One raw input per event.
pub type EventInputs = BTreeMap<Event, RawInput>;

/// All six event scores and their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub bracket: AgeBracket,
    pub sex: Sex,
    pub events: BTreeMap<Event, EventScore>,
    pub overall: i32,
}

impl CompositeScore {
    pub fn points(&self, event: Event) -> Option<i32> {
        self.events.get(&event).map(|score| score.points)
    }

    pub fn points_by_event(&self) -> BTreeMap<Event, i32> {
        self.events
            .iter()
            .map(|(event, score)| (*event, score.points))
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompositeError {
    #[error("age {0} is outside the scored range 17-75")]
    InvalidAge(u32),
    #[error("no raw score supplied for {0}")]
    MissingInput(Event),
    #[error("{event} could not be scored: {source}")]
    Event {
        event: Event,
        #[source]
        source: ScoringError,
    },
}

impl CompositeError {
    /// The event that failed, when the failure belongs to one.
    pub fn event(&self) -> Option<Event> {
        match self {
            CompositeError::InvalidAge(_) => None,
            CompositeError::MissingInput(event) | CompositeError::Event { event, .. } => {
                Some(*event)
            }
        }
    }

    pub fn scoring_error(&self) -> Option<&ScoringError> {
        match self {
            CompositeError::InvalidAge(_) | CompositeError::MissingInput(_) => None,
            CompositeError::Event { source, .. } => Some(source),
        }
    }
}

/// Scores all six events; the whole composite fails if any single event does.
pub struct CompositeScorer<L> {
    resolver: ScoreResolver<L>,
}

impl<L> Clone for CompositeScorer<L> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}

impl<L: TableLoader> CompositeScorer<L> {
    pub fn new(resolver: ScoreResolver<L>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ScoreResolver<L> {
        &self.resolver
    }

    pub fn score(
        &self,
        age: u32,
        sex: Sex,
        inputs: &EventInputs,
    ) -> Result<CompositeScore, CompositeError> {
        let bracket = AgeBracket::classify(age).map_err(|_| CompositeError::InvalidAge(age))?;
        if let Some(missing) = Event::ALL
            .into_iter()
            .find(|event| !inputs.contains_key(event))
        {
            return Err(CompositeError::MissingInput(missing));
        }

        let mut events = BTreeMap::new();
        for (event, input) in inputs {
            let score = self
                .resolver
                .resolve_input(*event, age, sex, input)
                .map_err(|source| CompositeError::Event {
                    event: *event,
                    source,
                })?;
            events.insert(*event, score);
        }

        let overall = events.values().map(|score| score.points).sum();
        debug!(age, %sex, %bracket, overall, "composite scored");

        Ok(CompositeScore {
            bracket,
            sex,
            events,
            overall,
        })
    }
}
