//! API key check.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::server::AppState;

/// Reject requests whose `Authorization` header is not exactly the API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if provided != Some(state.api_key.as_ref()) {
        warn!(path = %request.uri().path(), "Rejected request with invalid API key");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid API Key" })),
        )
            .into_response();
    }

    next.run(request).await
}
