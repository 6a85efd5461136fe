use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::repository::ScoreHistory;
use super::service::{ScoringService, ScoringServiceError};
use crate::scoring::{CompositeScore, Event, EventInputs, RawInput, Sex, TableLoader};

#[derive(Debug, Serialize, Deserialize)]
pub struct EventScoreRequest {
    pub event: Event,
    pub age: u32,
    pub sex: Sex,
    pub raw: RawInput,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompositeScoreRequest {
    pub age: u32,
    pub sex: Sex,
    pub inputs: EventInputs,
    /// When present the result is appended to this user's history.
    #[serde(default)]
    pub username: Option<String>,
    /// Test date for the history record; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CompositeScoreResponse {
    #[serde(flatten)]
    pub score: CompositeScore,
    pub recorded: bool,
}

/// Router builder exposing the scoring engine and score history over HTTP.
pub fn scoring_router<L, H>(service: Arc<ScoringService<L, H>>) -> Router
where
    L: TableLoader + 'static,
    H: ScoreHistory + 'static,
{
    Router::new()
        .route("/api/v1/scores/event", post(event_handler::<L, H>))
        .route("/api/v1/scores", post(composite_handler::<L, H>))
        .route("/api/v1/history/:username", get(history_handler::<L, H>))
        .with_state(service)
}

pub(crate) async fn event_handler<L, H>(
    State(service): State<Arc<ScoringService<L, H>>>,
    axum::Json(request): axum::Json<EventScoreRequest>,
) -> Response
where
    L: TableLoader + 'static,
    H: ScoreHistory + 'static,
{
    match service.score_event(request.event, request.age, request.sex, &request.raw) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn composite_handler<L, H>(
    State(service): State<Arc<ScoringService<L, H>>>,
    axum::Json(request): axum::Json<CompositeScoreRequest>,
) -> Response
where
    L: TableLoader + 'static,
    H: ScoreHistory + 'static,
{
    let CompositeScoreRequest {
        age,
        sex,
        inputs,
        username,
        date,
    } = request;

    let outcome = match username {
        Some(username) => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            service
                .record(&username, date, age, sex, inputs)
                .map(|(score, _)| CompositeScoreResponse {
                    score,
                    recorded: true,
                })
        }
        None => service
            .score(age, sex, &inputs)
            .map(|score| CompositeScoreResponse {
                score,
                recorded: false,
            }),
    };

    match outcome {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn history_handler<L, H>(
    State(service): State<Arc<ScoringService<L, H>>>,
    Path(username): Path<String>,
) -> Response
where
    L: TableLoader + 'static,
    H: ScoreHistory + 'static,
{
    match service.history(&username) {
        Ok(records) => {
            let payload = json!({
                "username": username,
                "records": records,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => failure_response(error),
    }
}

fn failure_response(error: ScoringServiceError) -> Response {
    let status = if error.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        warn!(%error, "scoring request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let mut payload = json!({ "error": error.to_string() });
    if let ScoringServiceError::Composite(composite) = &error {
        if let Some(event) = composite.event() {
            payload["event"] = json!(event);
        }
    }

    (status, axum::Json(payload)).into_response()
}
