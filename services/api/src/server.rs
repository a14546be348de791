use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPostingRepository};
use crate::routes::with_posting_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use formularios::config::AppConfig;
use formularios::error::AppError;
use formularios::postings::PostingService;
use formularios::telemetry;
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
    if let Some(seed) = args.seed.take() {
        config.storage.seed_path = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryPostingRepository::load_optional(
        config.storage.seed_path.as_deref(),
    )?);
    let posting_service = Arc::new(PostingService::new(repository));

    let app = with_posting_routes(posting_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(%addr, seed = ?config.storage.seed_path, "formularios service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
