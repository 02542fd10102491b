//! Search index provider trait definition.
//!
//! This module defines the transport-level interface to the search engine,
//! allowing the Solr implementation to be swapped for fakes in tests.

use async_trait::async_trait;

use crate::document::IndexDocument;
use crate::errors::SearchIndexError;
use crate::query::SearchQuery;

/// Abstracts the underlying search engine transport.
///
/// A provider is the handle published by a
/// [`ConnectionGuard`](crate::connection::ConnectionGuard) once the engine is
/// reachable. It performs single attempts only; readiness checks and record
/// mapping live in [`SearchIndexService`](crate::service::SearchIndexService).
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check that the engine is reachable and the core is loaded.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the engine answered the ping
    /// * `Err(SearchIndexError::ConnectionError)` - Otherwise
    async fn ping(&self) -> Result<(), SearchIndexError>;

    /// Submit documents for insert-or-replace, keyed by their `id` field.
    ///
    /// Submitted documents are not visible to queries until [`commit`](Self::commit).
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the engine accepted every document
    /// * `Err(SearchIndexError::IndexWriteError)` - If the submission failed
    async fn add_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError>;

    /// Make previously submitted documents visible to queries.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the commit succeeded
    /// * `Err(SearchIndexError::IndexWriteError)` - If the commit failed
    async fn commit(&self) -> Result<(), SearchIndexError>;

    /// Run a query and return matching documents in engine result order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<IndexDocument>)` - At most `query.rows()` documents
    /// * `Err(SearchIndexError::IndexQueryError)` - If the engine failed the query
    async fn select(&self, query: &SearchQuery) -> Result<Vec<IndexDocument>, SearchIndexError>;
}
