use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScoreHistory};
use crate::routes::with_scoring_routes;
use acft_score::config::AppConfig;
use acft_score::error::AppError;
use acft_score::scorecard::ScoringService;
use acft_score::scoring::{CachedTableLoader, CompositeScorer, ScoreResolver, StandardsSource};
use acft_score::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(directory) = args.tables_dir.take() {
        config.tables.directory = Some(directory);
    }

    telemetry::init(&config.telemetry)?;

    let tables = Arc::new(CachedTableLoader::new(StandardsSource::from_config(
        &config.tables,
    )));
    let loaded = tables.preload()?;
    info!(loaded, directory = ?config.tables.directory, "standards tables preloaded");

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        tables: Arc::clone(&tables),
    };

    let history = Arc::new(InMemoryScoreHistory::default());
    let scoring_service = Arc::new(ScoringService::new(
        CompositeScorer::new(ScoreResolver::new(tables)),
        history,
    ));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "acft score service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
