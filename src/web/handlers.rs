//! HTTP request handlers

use super::state::AppState;
use crate::error::SearchError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query; missing is treated as empty
    pub q: Option<String>,
}

/// Search handler
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.unwrap_or_default();

    match state.search.execute(&query).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Map a search failure onto a JSON error response
fn error_response(error: &SearchError) -> Response {
    let status = match error {
        SearchError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
        SearchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "mode": state.settings.general.mode,
        "backend": state.backend_name()
    }))
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
