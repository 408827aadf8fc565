use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_notice_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use notice_ai::config::AppConfig;
use notice_ai::error::AppError;
use notice_ai::model::{GeminiClient, GenerativeModel};
use notice_ai::service::NoticeService;
use notice_ai::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if !config.model.has_api_key() {
        warn!("GEMINI_API_KEY is not set; notice classification will fail");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(config.model.clone()));
    let service = NoticeService::new(model);

    let app = with_notice_routes(service, &config.cors)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model = %config.model.model,
        "campus notice api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
