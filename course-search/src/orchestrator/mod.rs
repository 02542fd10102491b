//! Orchestrator module for the course search service.
//!
//! Bridges the catalog, the update queue and the search index.

use std::sync::Arc;

use async_trait::async_trait;
use course_search_repository::SearchIndexService;
use course_search_shared::{CourseId, CourseRecord};
use tracing::{error, info, instrument, warn};

use crate::catalog::CatalogSource;
use crate::consumer::MessageHandler;
use crate::errors::SyncError;

/// Outcome of a full catalog reindex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReindexSummary {
    /// Number of courses returned by the catalog.
    pub total: usize,
    /// Number of courses indexed successfully.
    pub succeeded: usize,
    /// Number of courses that failed to index.
    pub failed: usize,
    /// Ids of the courses that failed to index.
    pub failed_ids: Vec<CourseId>,
}

/// Keeps the search index in sync with the catalog.
///
/// Two indexing flows go through the coordinator:
/// - single-course updates, triggered by queue messages
/// - a full reindex of the catalog, run once at startup
///
/// It also passes searches through to the index. There is no transaction
/// between a catalog fetch and the following upsert; a failure in between
/// leaves the index stale until the next update or reindex.
pub struct SyncCoordinator {
    catalog: Arc<dyn CatalogSource>,
    index: SearchIndexService,
}

impl SyncCoordinator {
    pub fn new(catalog: Arc<dyn CatalogSource>, index: SearchIndexService) -> Self {
        Self { catalog, index }
    }

    /// The index this coordinator writes to.
    pub fn index(&self) -> &SearchIndexService {
        &self.index
    }

    /// Fetch one course from the catalog and upsert it into the index.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the course was fetched and indexed
    /// * `Err(SyncError::UpstreamError)` - If the catalog fetch failed
    /// * `Err(SyncError::Index)` - If the index was not ready or rejected the write
    #[instrument(skip(self), fields(course_id = %course_id))]
    pub async fn handle_update(&self, course_id: &CourseId) -> Result<(), SyncError> {
        let course = self.catalog.fetch_course(course_id).await?;

        if course.id != *course_id {
            warn!(returned_id = %course.id, "Catalog returned a different course id");
        }

        self.index.upsert(&course).await?;
        Ok(())
    }

    /// Upsert every course in the catalog.
    ///
    /// A failed upsert is logged and does not stop the remaining ones.
    ///
    /// # Returns
    ///
    /// * `Ok(ReindexSummary)` - Per-course outcome counts
    /// * `Err(SyncError::UpstreamError)` - If the catalog listing could not be fetched
    #[instrument(skip(self))]
    pub async fn reindex_all(&self) -> Result<ReindexSummary, SyncError> {
        let courses = self.catalog.fetch_all().await?;

        let mut summary = ReindexSummary {
            total: courses.len(),
            ..ReindexSummary::default()
        };

        info!(total = summary.total, "Reindexing catalog");

        for course in &courses {
            match self.index.upsert(course).await {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    error!(course_id = %course.id, error = %e, "Failed to index course");
                    summary.failed += 1;
                    summary.failed_ids.push(course.id.clone());
                }
            }
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Catalog reindex finished"
        );

        Ok(summary)
    }

    /// Wait for the index connection, then reindex the catalog once.
    ///
    /// Returns `None` if the index connection is shut down before it becomes
    /// ready or the reindex fails.
    pub async fn reindex_when_ready(&self) -> Option<ReindexSummary> {
        self.index.connection().await_ready().await?;

        match self.reindex_all().await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!(error = %e, "Startup reindex failed");
                None
            }
        }
    }

    /// Search indexed courses by free text.
    ///
    /// Fails with a not-ready error, without touching the engine, when the
    /// index connection is not established.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Vec<CourseRecord>, SyncError> {
        Ok(self.index.search(text).await?)
    }
}

#[async_trait]
impl MessageHandler for SyncCoordinator {
    async fn handle(&self, course_id: &CourseId) -> Result<(), SyncError> {
        self.handle_update(course_id).await
    }
}
