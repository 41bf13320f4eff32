use crate::completion::{CompletionError, CompletionService};
use crate::pipeline::generate_caption;
use crate::prompt::CaptionRequest;
use crate::summary::{summarize_page, PageContent, PageSummary};
use axum::{
    extract::{Json as JsonPayload, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub completion: Arc<dyn CompletionService>,
    pub model: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // captions
        .route("/api/generate-caption", post(create_caption))
        .route("/api/preview-prompt", post(preview_prompt))
        // summaries
        .route("/api/summarize", post(summarize))
        // misc
        .route("/api/health", get(health))
        .with_state(Arc::new(state))
}

// -------------------------------------------------------------------
// Captions

async fn create_caption(
    State(state): State<Arc<AppState>>,
    JsonPayload(payload): JsonPayload<CaptionRequest>,
) -> Result<Json<CaptionResponse>, ApiError> {
    if payload.topic.trim().is_empty() {
        return Err(ApiError::bad_request("topic_empty", "Please enter a topic"));
    }

    let generated = generate_caption(state.completion.as_ref(), &payload).await?;
    Ok(Json(CaptionResponse {
        platform: generated.platform.to_string(),
        caption: generated.caption.text,
        hashtags: generated.caption.hashtags,
        max_length: generated.max_length,
    }))
}

async fn preview_prompt(
    JsonPayload(payload): JsonPayload<CaptionRequest>,
) -> Result<Json<PromptResponse>, ApiError> {
    if payload.topic.trim().is_empty() {
        return Err(ApiError::bad_request("topic_empty", "Please enter a topic"));
    }
    let built = payload.build_prompt();
    Ok(Json(PromptResponse {
        platform: built.platform.to_string(),
        prompt: built.prompt,
        max_length: built.max_length,
    }))
}

// -------------------------------------------------------------------
// Summaries

async fn summarize(
    State(state): State<Arc<AppState>>,
    JsonPayload(payload): JsonPayload<PageContent>,
) -> Result<Json<PageSummary>, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::bad_request("content_empty", "The page has no text to summarize"));
    }
    let summary = summarize_page(state.completion.as_ref(), &payload).await?;
    Ok(Json(summary))
}

// -------------------------------------------------------------------
// Health

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.model.clone(),
    })
}

// -------------------------------------------------------------------
// Shared helpers & DTOs

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptionResponse {
    platform: String,
    caption: String,
    hashtags: Vec<String>,
    max_length: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptResponse {
    platform: String,
    prompt: String,
    max_length: usize,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }
    fn bad_request(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, msg)
    }
}

impl From<CompletionError> for ApiError {
    fn from(e: CompletionError) -> Self {
        let (status, code) = match &e {
            CompletionError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            CompletionError::InvalidModel(_) => (StatusCode::BAD_GATEWAY, "invalid_model"),
            CompletionError::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "upstream_unavailable"),
            CompletionError::MalformedCompletion(_) => (StatusCode::BAD_GATEWAY, "malformed_completion"),
        };
        tracing::warn!(code, error = %e, "completion failed");
        Self::new(status, code, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorBody { code: self.code, message: self.message });
        (self.status, body).into_response()
    }
}
