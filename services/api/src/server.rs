use crate::cli::ServeArgs;
use crate::infra::{engine_from_config, AppState, InMemorySnapshotRepository};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use seller_scorecard::config::AppConfig;
use seller_scorecard::error::AppError;
use seller_scorecard::scoring::ScorecardService;
use seller_scorecard::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemorySnapshotRepository::default());
    let engine = engine_from_config(&config.scoring);
    let scorecard_service = Arc::new(ScorecardService::new(repository, engine));

    let app = with_scoring_routes(scorecard_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_base_salary = config.scoring.default_base_salary,
        tiers = config.scoring.multiplier_schedule.tiers().len(),
        "seller scorecard service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
