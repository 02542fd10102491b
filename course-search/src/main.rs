//! Course Search Main Entry Point
//!
//! Keeps the Solr course index in sync with the catalog and serves search
//! over HTTP.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use course_search::{server, Dependencies, ServiceError, Settings};
use dotenv::dotenv;
use tokio::time::timeout;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How long background tasks get to wind down after the server stops.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), ServiceError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("course_search=info,course_search_repository=info,tower_http=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| ServiceError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "course-search",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| ServiceError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "course-search",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
}

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting course search service");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    let deps = Dependencies::new(settings)?;
    let tasks = deps.start();

    let addr = SocketAddr::from(([0, 0, 0, 0], deps.settings.port));
    let app = server::create_app(deps.app_state());
    let result = server::run_server(app, addr, shutdown_signal()).await;

    deps.shutdown();
    for task in tasks {
        if timeout(SHUTDOWN_GRACE, task).await.is_err() {
            warn!("Background task did not stop in time");
        }
    }

    match &result {
        Ok(()) => info!("Course search service stopped"),
        Err(e) => error!(error = %e, "Course search service failed"),
    }
    result
}
