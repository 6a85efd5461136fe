use crate::commands::standards_view;
use crate::infra::{AppState, Tables};
use crate::views::StandardsView;
use acft_score::error::AppError;
use acft_score::scorecard::{scoring_router, ScoreHistory, ScoringService};
use acft_score::scoring::{Event, Sex};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_scoring_routes<H>(service: Arc<ScoringService<Tables, H>>) -> axum::Router
where
    H: ScoreHistory + 'static,
{
    scoring_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/standards/:event/:sex/:age",
            axum::routing::get(standards_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "tables": state.tables.cached() })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Standards column for the bracket `age` falls in.
pub(crate) async fn standards_endpoint(
    Extension(state): Extension<AppState>,
    Path((event, sex, age)): Path<(String, String, u32)>,
) -> Result<Json<StandardsView>, AppError> {
    let event = event.parse::<Event>()?;
    let sex = sex.parse::<Sex>()?;
    let view = standards_view(state.tables.as_ref(), event, sex, age)?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryScoreHistory;
    use acft_score::scoring::{
        AgeBracket, CachedTableLoader, CompositeScorer, EmbeddedTables, ScoreResolver,
        StandardsSource,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            tables: Arc::new(CachedTableLoader::new(StandardsSource::Embedded(
                EmbeddedTables,
            ))),
        }
    }

    fn app(state: AppState) -> axum::Router {
        let service = Arc::new(ScoringService::new(
            CompositeScorer::new(ScoreResolver::new(Arc::clone(&state.tables))),
            Arc::new(InMemoryScoreHistory::default()),
        ));
        with_scoring_routes(service).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (status, body) = get(app(app_state(false)), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, _) = get(app(app_state(true)), "/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn standards_endpoint_returns_bracket_column() {
        let Json(view) = standards_endpoint(
            Extension(app_state(true)),
            Path(("2MR".to_string(), "m".to_string(), 25)),
        )
        .await
        .expect("standards view");

        assert_eq!(view.event, Event::TwoMileRun);
        assert_eq!(view.bracket, AgeBracket::From22To26);
        assert_eq!(view.rows[0].threshold.as_deref(), Some("13:30"));
    }

    #[tokio::test]
    async fn standards_route_rejects_unknown_event() {
        let (status, body) = get(app(app_state(true)), "/api/v1/standards/burpees/M/25").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().is_some());

        let (status, _) = get(app(app_state(true)), "/api/v1/standards/DL/F/90").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn scoring_routes_are_mounted() {
        let request = Request::post("/api/v1/scores/event")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"event":"SDC","age":25,"sex":"M","raw":"1:45"}"#,
            ))
            .expect("request");
        let response = app(app_state(true))
            .oneshot(request)
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
