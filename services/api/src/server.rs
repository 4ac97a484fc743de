use crate::cli::ServeArgs;
use crate::infra::{load_configured_service, AppState};
use crate::routes::with_bonus_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bonus_panel::config::AppConfig;
use bonus_panel::error::AppError;
use bonus_panel::telemetry;
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

    let service = Arc::new(load_configured_service(&config.bonus)?);

    let app = with_bonus_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        data_dir = %config.bonus.data_dir.display(),
        "bonus panel ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
