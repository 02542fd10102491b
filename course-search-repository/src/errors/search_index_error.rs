//! Search index error types.
//!
//! This module defines the unified error type for all search index operations,
//! from readiness checks down to engine-level write and query failures.

use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait and `SearchIndexService`. Write failures
/// and query failures are kept apart so callers can skip a record on the former
/// and surface the latter.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// The search engine connection is not established.
    #[error("Search engine not ready: {0}")]
    NotReady(String),

    /// The engine rejected a document submission or commit.
    #[error("Index write error: {0}")]
    IndexWriteError(String),

    /// The engine failed to run a query.
    #[error("Index query error: {0}")]
    IndexQueryError(String),

    /// Failed to reach the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A record or document failed validation.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl SearchIndexError {
    /// Create a not-ready error.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Create an index write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::IndexWriteError(msg.into())
    }

    /// Create an index query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::IndexQueryError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether this error means the engine connection was not established.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }
}
