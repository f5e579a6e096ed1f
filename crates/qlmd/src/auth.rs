//! Bearer-token checks for the completion endpoints.
//!
//! Keys are never stored anywhere; when the gate is enabled it only checks
//! that the caller presents something shaped like an API key.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use qlm_common::config::AuthConfig;
use qlm_common::envelope::ErrorBody;

/// Passes when auth is disabled or the Authorization header carries
/// `Bearer sk-...`; otherwise yields a ready-to-return 401 response.
pub fn check_bearer(config: &AuthConfig, headers: &HeaderMap) -> Result<(), Response> {
    if !config.require_api_key {
        return Ok(());
    }

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(key) if key.starts_with("sk-") => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody::invalid_api_key()),
        )
            .into_response()),
    }
}
