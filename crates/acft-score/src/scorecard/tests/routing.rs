use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::scorecard::router::{scoring_router, EventScoreRequest};
use crate::scorecard::service::ScoringService;
use crate::scoring::{scorer_for, CachedTableLoader, Event, RawInput, Sex, StandardsSource};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn event_handler_scores_sprint_drag_carry() {
    let (service, _) = build_service();
    let response = crate::scorecard::router::event_handler(
        State(service),
        axum::Json(EventScoreRequest {
            event: Event::SprintDragCarry,
            age: 25,
            sex: Sex::Male,
            raw: RawInput::from("1:45"),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["points"], 95);
    assert_eq!(body["bracket"], "22-26");
    assert_eq!(body["resolution"], "rounded_down");
}

#[tokio::test]
async fn event_route_rejects_invalid_age() {
    let (service, _) = build_service();
    let response = scoring_router(service)
        .oneshot(post_json(
            "/api/v1/scores/event",
            json!({ "event": "DL", "age": 16, "sex": "M", "raw": 300 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("age 16"));
}

#[tokio::test]
async fn composite_route_scores_without_recording() {
    let (service, history) = build_service();
    let response = scoring_router(service)
        .oneshot(post_json(
            "/api/v1/scores",
            json!({
                "age": 25,
                "sex": "M",
                "inputs": serde_json::to_value(mixed_inputs()).unwrap()
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["overall"], 435);
    assert_eq!(body["recorded"], false);
    assert_eq!(body["events"]["PLK"]["points"], 100);
    assert!(history.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn composite_route_records_and_history_route_lists() {
    let (service, _) = build_service();
    let router = scoring_router(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/scores",
            json!({
                "age": 25,
                "sex": "male",
                "username": "jdoe",
                "date": "2025-03-14",
                "inputs": {
                    "DL": 340, "SPT": "13.0", "HRP": 61,
                    "SDC": "1:40", "PLK": "3:35", "2MR": "13:30"
                }
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["recorded"], true);

    let response = router
        .oneshot(
            Request::get("/api/v1/history/jdoe")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let records = body["records"].as_array().expect("records array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["overall"], 600);
    assert_eq!(records[0]["date"], "2025-03-14");
}

#[tokio::test]
async fn composite_route_names_failing_event() {
    let (service, _) = build_service();
    let mut inputs = serde_json::to_value(max_inputs()).unwrap();
    inputs["SDC"] = json!("one forty");

    let response = scoring_router(service)
        .oneshot(post_json(
            "/api/v1/scores",
            json!({ "age": 25, "sex": "M", "inputs": inputs }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["event"], "SDC");
}

#[tokio::test]
async fn history_route_reports_unavailable_store() {
    let service: Arc<ScoringService<CachedTableLoader<StandardsSource>, UnavailableHistory>> =
        Arc::new(ScoringService::new(
            scorer_for(StandardsSource::Embedded(Default::default())),
            Arc::new(UnavailableHistory),
        ));

    let response = scoring_router(service)
        .oneshot(
            Request::get("/api/v1/history/jdoe")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn non_positive_times_are_unprocessable_and_not_recorded() {
    let (service, history) = build_service();
    let router = scoring_router(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/scores/event",
            json!({ "event": "2MR", "age": 25, "sex": "M", "raw": -30 }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let mut inputs = serde_json::to_value(max_inputs()).expect("inputs serialize");
    inputs["SDC"] = json!(0);
    let response = router
        .oneshot(post_json(
            "/api/v1/scores",
            json!({ "age": 25, "sex": "M", "username": "jdoe", "inputs": inputs }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["event"], "SDC");
    assert!(history.records.lock().unwrap().is_empty());
}
