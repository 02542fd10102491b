//! Error types for course synchronization.

use course_search_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur while syncing the index with the catalog.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The catalog was unreachable or returned a non-success or malformed response.
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    /// The search index rejected the operation or is not ready.
    #[error(transparent)]
    Index(#[from] SearchIndexError),

    /// Message broker error.
    #[error("Broker error: {0}")]
    BrokerError(String),
}

impl SyncError {
    /// Create an upstream error.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamError(msg.into())
    }

    /// Create a broker error.
    pub fn broker(msg: impl Into<String>) -> Self {
        Self::BrokerError(msg.into())
    }

    /// Whether the search engine connection was not established.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::Index(e) if e.is_not_ready())
    }
}

impl From<lapin::Error> for SyncError {
    fn from(err: lapin::Error) -> Self {
        Self::BrokerError(err.to_string())
    }
}
