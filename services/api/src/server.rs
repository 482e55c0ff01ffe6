use crate::cli::ServeArgs;
use crate::infra::{chat_state, triage_engine, AppState};
use crate::routes::with_triage_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mediguide::config::AppConfig;
use mediguide::error::AppError;
use mediguide::telemetry;
use std::sync::atomic::Ordering;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(triage_engine(&config, args.rules.take()));
    if engine.source().is_fallback() {
        warn!("serving with the built-in fallback rule table");
    }

    let chat = chat_state(&config.chat)?;
    if !chat.gateway.client().has_api_key() {
        warn!("OPENROUTER_API_KEY is not set; chat replies will use fallback guidance");
    }
    let model = chat.gateway.client().model().to_string();

    let app = with_triage_routes(engine.clone(), chat)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        rule_tokens = engine.rules().len(),
        critical_conditions = engine.critical_conditions().names().count(),
        %model,
        "mediguide triage service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
