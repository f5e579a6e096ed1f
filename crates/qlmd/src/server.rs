//! HTTP server for qlmd

use crate::routes;
use anyhow::Result;
use axum::Router;
use qlm_common::config::QlmConfig;
use qlm_common::selector::ResponseSelector;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    /// Calls to `select` serialize through this mutex to keep the recency
    /// buffer's FIFO invariant under concurrent requests.
    pub selector: Mutex<ResponseSelector>,
    pub config: QlmConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(selector: ResponseSelector, config: QlmConfig) -> Self {
        Self {
            selector: Mutex::new(selector),
            config,
            start_time: Instant::now(),
        }
    }
}

/// Assemble the router. Split out of `run` so tests can drive it directly.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::landing_routes())
        .merge(routes::health_routes())
        .merge(routes::model_routes())
        .merge(routes::completion_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            // Web demo pages call the API from any origin.
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.server.bind_addr();
    let state = Arc::new(state);
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
