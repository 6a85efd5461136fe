//! Caller-facing surface around the scoring engine: score history records, the service
//! that scores and records tests, and the HTTP routes for both.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{HistoryError, ScoreHistory, ScoreRecord};
pub use router::{
    scoring_router, CompositeScoreRequest, CompositeScoreResponse, EventScoreRequest,
};
pub use service::{ScoringService, ScoringServiceError};
