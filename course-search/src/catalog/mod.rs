//! Catalog module for the course search service.
//!
//! The catalog API is the source of truth for course records; the index only
//! ever holds copies fetched from it.

mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use course_search_shared::{CourseId, CourseRecord};

use crate::errors::SyncError;

/// Source of full course records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one course by id.
    ///
    /// Fails with [`SyncError::UpstreamError`] when the catalog is unreachable,
    /// answers with a non-success status, or returns a body that does not
    /// decode into a course.
    async fn fetch_course(&self, id: &CourseId) -> Result<CourseRecord, SyncError>;

    /// Fetch every course in the catalog.
    ///
    /// Items that do not decode into a course are skipped.
    async fn fetch_all(&self) -> Result<Vec<CourseRecord>, SyncError>;
}
