//! # Course Search
//!
//! Course search service: keeps a Solr index of course records in sync with
//! the upstream course catalog and serves free-text search over it.
//!
//! ## Architecture
//!
//! 1. **Connections**: one guarded, self-healing connection per external
//!    dependency (Solr, RabbitMQ)
//! 2. **Consumer**: consumes course-update messages from a durable queue
//! 3. **Catalog**: fetches full course records from the catalog API
//! 4. **Orchestrator**: syncs single courses on update and the whole catalog at
//!    startup, and passes searches through to the index
//! 5. **Server**: HTTP search endpoint
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency wiring
//! - [`consumer`]: RabbitMQ subscriber
//! - [`catalog`]: Catalog API client
//! - [`orchestrator`]: Sync coordination
//! - [`server`]: HTTP routes and middleware
//! - [`errors`]: Error types for syncing

pub mod catalog;
pub mod config;
pub mod consumer;
pub mod errors;
pub mod orchestrator;
pub mod server;

pub use config::{Dependencies, Settings};
pub use errors::SyncError;

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Sync error.
    #[error("Sync error: {0}")]
    SyncError(#[from] SyncError),

    /// HTTP server error.
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
