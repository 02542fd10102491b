//! Request handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::server::dto::SearchCoursesResponse;
use crate::server::AppState;

/// Query string of the search endpoint. A missing `q` searches everything.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn search_courses(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    match state.coordinator.search(&params.q).await {
        Ok(courses) => (StatusCode::OK, Json(SearchCoursesResponse::from(courses))).into_response(),
        Err(e) => {
            error!(query = %params.q, error = %e, "Search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Response {
    let engine_ready = state.coordinator.index().is_ready();
    let broker_ready = state.broker.is_ready();

    let status = if engine_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "search_engine": readiness(engine_ready),
            "broker": readiness(broker_ready),
        })),
    )
        .into_response()
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Ruta no encontrada" })),
    )
        .into_response()
}

fn readiness(ready: bool) -> &'static str {
    if ready {
        "ready"
    } else {
        "unavailable"
    }
}
