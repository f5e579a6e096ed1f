//! API routes for qlmd
//!
//! Completion endpoints are registered both bare and under /v1 so that
//! stock OpenAI client libraries (which prepend /v1) and hand-rolled
//! callers both work.

use crate::auth;
use crate::server::AppState;
use crate::streaming;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use qlm_common::envelope::{
    ChatCompletionRequest, ChatCompletionResponse, CompletionRequest, CompletionResponse,
    HealthResponse, ModelList, DEFAULT_MODEL,
};
use std::sync::Arc;
use tracing::info;

type AppStateArc = Arc<AppState>;

const MODEL_OWNER: &str = "quack-lang-model";

// ============================================================================
// Landing page
// ============================================================================

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>QLM - Quack Language Model</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 4rem auto; padding: 0 1rem; }
    code { background: #f4f4f4; padding: 0.1rem 0.3rem; border-radius: 3px; }
    h1 { font-size: 1.6rem; }
  </style>
</head>
<body>
  <h1>&#129414; QLM - Quack Language Model</h1>
  <p>A duck-themed language model API, compatible with the OpenAI wire format.
     Every reply is a duck sound. No exceptions. Well, almost.</p>
  <ul>
    <li><code>POST /chat/completions</code> &mdash; chat completion (streaming supported)</li>
    <li><code>POST /completions</code> &mdash; legacy text completion</li>
    <li><code>GET /models</code> &mdash; list available models</li>
    <li><code>GET /health</code> &mdash; health check</li>
  </ul>
  <p>Point any OpenAI client at this server and enjoy the quacks.</p>
</body>
</html>
"#;

pub fn landing_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(landing))
}

async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: Utc::now().timestamp(),
    })
}

// ============================================================================
// Model Routes
// ============================================================================

pub fn model_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/models", get(list_models))
        .route("/v1/models", get(list_models))
}

async fn list_models() -> Json<ModelList> {
    Json(ModelList::single(DEFAULT_MODEL, MODEL_OWNER))
}

// ============================================================================
// Completion Routes
// ============================================================================

pub fn completion_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/chat/completions", post(chat_completions))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/completions", post(completions))
        .route("/v1/completions", post(completions))
}

async fn chat_completions(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    Json(req): Json<ChatCompletionRequest>,
) -> Response {
    if let Err(denied) = auth::check_bearer(&state.config.auth, &headers) {
        return denied;
    }

    let prompt = req.prompt();
    info!("[Q]  chat completion: model={} stream={}", req.model, req.stream);

    let reply = {
        let mut selector = state.selector.lock().await;
        selector.select(&prompt)
    };

    if req.stream {
        streaming::chat_completion_stream(
            &req.model,
            &prompt,
            &reply,
            req.include_usage_in_stream(),
        )
        .into_response()
    } else {
        Json(ChatCompletionResponse::new(&req.model, &prompt, &reply)).into_response()
    }
}

async fn completions(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    Json(req): Json<CompletionRequest>,
) -> Response {
    if let Err(denied) = auth::check_bearer(&state.config.auth, &headers) {
        return denied;
    }

    info!("[Q]  legacy completion: model={}", req.model);

    let reply = {
        let mut selector = state.selector.lock().await;
        selector.select(&req.prompt)
    };

    Json(CompletionResponse::new(&req.model, &req.prompt, &reply)).into_response()
}
