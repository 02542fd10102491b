//! Fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use course_search::catalog::CatalogSource;
use course_search::orchestrator::SyncCoordinator;
use course_search::SyncError;
use course_search_repository::{
    IndexDocument, SearchConnection, SearchIndexError, SearchIndexProvider, SearchIndexService,
    SearchQuery,
};
use course_search_shared::{CourseId, CourseRecord};
use tokio::sync::Mutex;

pub fn course_id(n: u32) -> CourseId {
    format!("65a1b2c3d4e5f607{:08x}", n).parse().unwrap()
}

pub fn course(n: u32, name: &str) -> CourseRecord {
    let mut record = CourseRecord::new(course_id(n));
    record.name = name.to_string();
    record.description = format!("{} course", name);
    record.active = true;
    record.capacity = 20;
    record
}

/// In-memory index that can be told to reject specific course ids.
#[derive(Default)]
pub struct MockProvider {
    documents: Mutex<Vec<IndexDocument>>,
    staged: Mutex<Vec<IndexDocument>>,
    rejected_ids: HashSet<String>,
    fail_queries: bool,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn rejecting(ids: &[CourseId]) -> Self {
        Self {
            rejected_ids: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_queries() -> Self {
        Self {
            fail_queries: true,
            ..Self::default()
        }
    }

    pub async fn indexed_ids(&self) -> Vec<String> {
        self.documents
            .lock()
            .await
            .iter()
            .filter_map(|doc| doc.id())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndexProvider for MockProvider {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn add_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for document in documents {
            if let Some(id) = document.id() {
                if self.rejected_ids.contains(&id) {
                    return Err(SearchIndexError::write(format!("rejected {}", id)));
                }
            }
        }
        self.staged.lock().await.extend_from_slice(documents);
        Ok(())
    }

    async fn commit(&self) -> Result<(), SearchIndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let staged: Vec<IndexDocument> = self.staged.lock().await.drain(..).collect();
        let mut documents = self.documents.lock().await;
        for document in staged {
            documents.retain(|existing| existing.id() != document.id());
            documents.push(document);
        }
        Ok(())
    }

    async fn select(&self, query: &SearchQuery) -> Result<Vec<IndexDocument>, SearchIndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(SearchIndexError::query("engine exploded"));
        }
        let documents = self.documents.lock().await;
        let needle = query.text().map(str::to_lowercase);
        Ok(documents
            .iter()
            .filter(|doc| match &needle {
                None => true,
                Some(needle) => doc
                    .get("course_name")
                    .and_then(|value| value.as_str())
                    .map(|name| name.to_lowercase().contains(needle.as_str()))
                    .unwrap_or(false),
            })
            .cloned()
            .collect())
    }
}

/// Catalog backed by a fixed set of courses.
#[derive(Default)]
pub struct FakeCatalog {
    courses: Vec<CourseRecord>,
    fail_listing: bool,
    fetches: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_courses(courses: Vec<CourseRecord>) -> Self {
        Self {
            courses,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail_listing: true,
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_course(&self, id: &CourseId) -> Result<CourseRecord, SyncError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.courses
            .iter()
            .find(|course| &course.id == id)
            .cloned()
            .ok_or_else(|| SyncError::upstream(format!("Catalog returned status 404 for {}", id)))
    }

    async fn fetch_all(&self) -> Result<Vec<CourseRecord>, SyncError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(SyncError::upstream("Catalog returned status 503"));
        }
        Ok(self.courses.clone())
    }
}

/// Index connection that is already established over `provider`.
pub fn ready_index(provider: Arc<MockProvider>) -> SearchIndexService {
    let provider: Arc<dyn SearchIndexProvider> = provider;
    SearchIndexService::new(Arc::new(SearchConnection::established("solr", provider)))
}

/// Index connection that never becomes ready.
pub fn disconnected_index() -> SearchIndexService {
    SearchIndexService::new(Arc::new(SearchConnection::new("solr")))
}

pub fn coordinator(catalog: FakeCatalog, index: SearchIndexService) -> Arc<SyncCoordinator> {
    Arc::new(SyncCoordinator::new(Arc::new(catalog), index))
}
