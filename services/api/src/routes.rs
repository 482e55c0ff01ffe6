use crate::infra::{AppState, ChatState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use mediguide::chat::{
    assistant_conversation, triage_messages, ChatCompletion, ChatMessage, ChatReply,
};
use mediguide::error::AppError;
use mediguide::triage::{triage_router, TriageEngine, TriageReport, TriageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    pub(crate) history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) reply: ChatReply,
    pub(crate) redacted: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalysisResponse {
    pub(crate) report: TriageReport,
    pub(crate) analysis: ChatReply,
}

pub(crate) fn with_triage_routes<C>(engine: Arc<TriageEngine>, chat: ChatState<C>) -> axum::Router
where
    C: ChatCompletion + Send + Sync + 'static,
{
    triage_router(engine.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/chat", axum::routing::post(chat_endpoint::<C>))
        .route(
            "/api/v1/triage/analysis",
            axum::routing::post(analysis_endpoint::<C>),
        )
        .layer(Extension(engine))
        .layer(Extension(chat))
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
        json!({ "status": "ready" })
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

pub(crate) async fn chat_endpoint<C>(
    Extension(chat): Extension<ChatState<C>>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse>
where
    C: ChatCompletion + Send + Sync + 'static,
{
    let (messages, redacted) = assistant_conversation(&payload.history, &chat.sanitizer);
    let reply = chat.gateway.reply(&messages).await;
    info!(turns = payload.history.len(), redacted, source = ?reply.source, "chat reply served");
    Json(ChatResponse { reply, redacted })
}

pub(crate) async fn analysis_endpoint<C>(
    Extension(engine): Extension<Arc<TriageEngine>>,
    Extension(chat): Extension<ChatState<C>>,
    Json(request): Json<TriageRequest>,
) -> Result<Json<AnalysisResponse>, AppError>
where
    C: ChatCompletion + Send + Sync + 'static,
{
    let report = engine.assess(request)?;
    let analysis = chat.gateway.reply(&triage_messages(&report)).await;
    Ok(Json(AnalysisResponse { report, analysis }))
}
