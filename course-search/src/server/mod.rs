//! HTTP surface of the course search service.
//!
//! Routes:
//! - `GET /search?q=...` and `GET /search/?q=...`: free-text course search
//! - `GET /health`: readiness of the search engine and broker connections
//!
//! Everything except `/health` requires the API key in the `Authorization`
//! header. Unknown paths answer 404 with a JSON error body.

mod auth;
mod dto;
mod handlers;
mod state;

pub use dto::{CourseDto, SearchCoursesResponse};
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ServiceError;

/// Build the router for the service.
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/search", get(handlers::search_courses))
        .route("/search/", get(handlers::search_courses))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `addr` until `shutdown` resolves.
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), ServiceError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
