use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{TriageEngine, TriageRequest};

#[derive(Debug, Deserialize)]
pub struct SanitizeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SanitizeResponse {
    pub text: String,
    pub redacted: bool,
}

/// Router exposing assessment and redaction over HTTP.
pub fn triage_router(engine: Arc<TriageEngine>) -> Router {
    Router::new()
        .route("/api/v1/triage/assess", post(assess_handler))
        .route("/api/v1/privacy/sanitize", post(sanitize_handler))
        .with_state(engine)
}

pub(crate) async fn assess_handler(
    State(engine): State<Arc<TriageEngine>>,
    Json(request): Json<TriageRequest>,
) -> Response {
    match engine.assess(request) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn sanitize_handler(
    State(engine): State<Arc<TriageEngine>>,
    Json(request): Json<SanitizeRequest>,
) -> Json<SanitizeResponse> {
    let (text, redacted) = engine.sanitizer().sanitize(&request.text);
    Json(SanitizeResponse { text, redacted })
}
