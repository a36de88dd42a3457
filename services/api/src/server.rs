use crate::cli::ServeArgs;
use crate::infra::{open_engine, AppState};
use crate::routes::with_protocol_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use longevity_protocol::config::AppConfig;
use longevity_protocol::error::AppError;
use longevity_protocol::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = open_engine(&config.engine)?;
    info!(
        state_path = %config.engine.state_path.display(),
        current_day = engine.current_day(),
        signed_in = config.engine.user_id.is_some(),
        "protocol state loaded"
    );

    let app = with_protocol_routes(Arc::new(Mutex::new(engine)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "longevity protocol service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
