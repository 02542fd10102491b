//! Search index service implementation.
//!
//! This module provides the main service for interacting with the course index.
//! Application code uses it to upsert course records and run free-text searches.
//!
//! # Readiness
//!
//! Every operation first takes a snapshot of the engine connection. When the
//! connection is not established the call fails with
//! [`SearchIndexError::NotReady`] without touching the network, so callers get a
//! clear signal instead of a transport error or a hang.

use std::sync::Arc;

use course_search_shared::CourseRecord;
use tracing::{debug, info, instrument};

use crate::connection::ConnectionGuard;
use crate::document::IndexDocument;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::query::SearchQuery;

/// Guarded connection to the search engine.
pub type SearchConnection = ConnectionGuard<Arc<dyn SearchIndexProvider>>;

/// The main service for interacting with the course index.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use course_search_repository::{SearchConnection, SearchIndexService};
/// use course_search_repository::solr::{SolrConfig, SolrConnector};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let connection = Arc::new(SearchConnection::new("solr"));
/// connection.start(SolrConnector::new(SolrConfig::new("localhost", 8983, "courses")));
///
/// let service = SearchIndexService::new(connection);
/// let courses = service.search("Rust").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchIndexService {
    connection: Arc<SearchConnection>,
}

impl SearchIndexService {
    pub fn new(connection: Arc<SearchConnection>) -> Self {
        Self { connection }
    }

    /// The guarded engine connection backing this service.
    pub fn connection(&self) -> &Arc<SearchConnection> {
        &self.connection
    }

    /// Non-blocking readiness check.
    pub fn is_ready(&self) -> bool {
        self.connection.is_ready()
    }

    fn provider(&self) -> Result<Arc<dyn SearchIndexProvider>, SearchIndexError> {
        self.connection.connection().ok_or_else(|| {
            SearchIndexError::not_ready(format!(
                "{} connection not established",
                self.connection.name()
            ))
        })
    }

    /// Insert or replace a course in the index and commit.
    ///
    /// The commit happens inside this call, so the change is visible to any
    /// search issued after it returns.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was submitted and committed
    /// * `Err(SearchIndexError::NotReady)` - If the engine connection is not established
    /// * `Err(SearchIndexError::IndexWriteError)` - If submission or commit failed
    #[instrument(skip(self, record), fields(course_id = %record.id))]
    pub async fn upsert(&self, record: &CourseRecord) -> Result<(), SearchIndexError> {
        let provider = self.provider()?;
        let document = IndexDocument::from(record);

        provider.add_documents(std::slice::from_ref(&document)).await?;
        provider.commit().await?;

        info!(course_name = %record.name, "Course indexed");
        Ok(())
    }

    /// Search courses by free text.
    ///
    /// An empty `text` matches every course. Results keep the engine's
    /// relevance order and are capped at [`MAX_RESULTS`](crate::query::MAX_RESULTS).
    /// Documents without a valid id are dropped.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CourseRecord>)` - Matching courses
    /// * `Err(SearchIndexError::NotReady)` - If the engine connection is not established
    /// * `Err(SearchIndexError::IndexQueryError)` - If the engine failed the query
    /// * `Err(SearchIndexError::ParseError)` - If the engine response could not be decoded
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Vec<CourseRecord>, SearchIndexError> {
        let provider = self.provider()?;
        let query = SearchQuery::new(text);

        let documents = provider.select(&query).await?;
        let total = documents.len();

        let courses: Vec<CourseRecord> = documents
            .iter()
            .filter_map(|document| match document.to_record() {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(error = %e, "Skipping undecodable document");
                    None
                }
            })
            .collect();

        debug!(total, returned = courses.len(), "Search completed");
        Ok(courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use course_search_shared::CourseId;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Mock provider for testing
    #[derive(Default)]
    struct MockProvider {
        documents: Mutex<Vec<IndexDocument>>,
        staged: Mutex<Vec<IndexDocument>>,
        queries: Mutex<Vec<SearchQuery>>,
        calls: AtomicUsize,
        fail_writes: bool,
        fail_queries: bool,
        results: Option<Vec<IndexDocument>>,
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ping(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn add_documents(
            &self,
            documents: &[IndexDocument],
        ) -> Result<(), SearchIndexError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(SearchIndexError::write("Mock failure"));
            }
            self.staged.lock().await.extend_from_slice(documents);
            Ok(())
        }

        async fn commit(&self) -> Result<(), SearchIndexError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let staged: Vec<IndexDocument> = self.staged.lock().await.drain(..).collect();
            let mut documents = self.documents.lock().await;
            for doc in staged {
                documents.retain(|existing| existing.id() != doc.id());
                documents.push(doc);
            }
            Ok(())
        }

        async fn select(
            &self,
            query: &SearchQuery,
        ) -> Result<Vec<IndexDocument>, SearchIndexError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().await.push(query.clone());
            if self.fail_queries {
                return Err(SearchIndexError::query("Mock failure"));
            }
            if let Some(results) = &self.results {
                return Ok(results.clone());
            }
            let documents = self.documents.lock().await;
            let matches = documents
                .iter()
                .filter(|doc| match query.text() {
                    None => true,
                    Some(text) => ["course_name", "description", "category_name"]
                        .iter()
                        .any(|field| {
                            doc.get(field)
                                .and_then(|v| v.as_str())
                                .is_some_and(|v| v.contains(text))
                        }),
                })
                .take(query.rows())
                .cloned()
                .collect();
            Ok(matches)
        }
    }

    fn service_with(provider: Arc<MockProvider>) -> SearchIndexService {
        let provider: Arc<dyn SearchIndexProvider> = provider;
        SearchIndexService::new(Arc::new(SearchConnection::established("solr", provider)))
    }

    fn course(id: &str, name: &str) -> CourseRecord {
        let mut record = CourseRecord::new(CourseId::parse(id).unwrap());
        record.name = name.to_string();
        record
    }

    #[tokio::test]
    async fn test_not_ready_makes_no_provider_call() {
        let service = SearchIndexService::new(Arc::new(SearchConnection::new("solr")));
        let record = course("65f1a2b3c4d5e6f708192a3b", "Rust 101");

        assert!(!service.is_ready());
        assert!(service.upsert(&record).await.unwrap_err().is_not_ready());
        assert!(service.search("Rust").await.unwrap_err().is_not_ready());
    }

    #[tokio::test]
    async fn test_upsert_then_search_by_exact_name() {
        let provider = Arc::new(MockProvider::default());
        let service = service_with(provider.clone());

        let record = course("65f1a2b3c4d5e6f708192a3b", "Rust for Backend Engineers");
        service.upsert(&record).await.unwrap();

        let found = service.search("Rust for Backend Engineers").await.unwrap();
        assert_eq!(found, vec![record]);
    }

    #[tokio::test]
    async fn test_upsert_commits_in_same_call() {
        let provider = Arc::new(MockProvider::default());
        let service = service_with(provider.clone());

        service
            .upsert(&course("65f1a2b3c4d5e6f708192a3b", "Rust"))
            .await
            .unwrap();

        assert!(provider.staged.lock().await.is_empty());
        assert_eq!(provider.documents.lock().await.len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_document() {
        let provider = Arc::new(MockProvider::default());
        let service = service_with(provider.clone());

        service
            .upsert(&course("65f1a2b3c4d5e6f708192a3b", "Old name"))
            .await
            .unwrap();
        service
            .upsert(&course("65f1a2b3c4d5e6f708192a3b", "New name"))
            .await
            .unwrap();

        let all = service.search("").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "New name");
    }

    #[tokio::test]
    async fn test_upsert_write_failure_is_surfaced() {
        let provider = Arc::new(MockProvider {
            fail_writes: true,
            ..Default::default()
        });
        let service = service_with(provider);

        let result = service
            .upsert(&course("65f1a2b3c4d5e6f708192a3b", "Rust"))
            .await;
        assert!(matches!(result, Err(SearchIndexError::IndexWriteError(_))));
    }

    #[tokio::test]
    async fn test_empty_search_is_capped_and_match_all() {
        let provider = Arc::new(MockProvider::default());
        let service = service_with(provider.clone());

        for i in 0..150u32 {
            let id = format!("{:024x}", i + 1);
            service.upsert(&course(&id, &format!("Course {}", i))).await.unwrap();
        }

        let all = service.search("").await.unwrap();
        assert_eq!(all.len(), 100);

        let queries = provider.queries.lock().await;
        assert_eq!(queries.last().unwrap().to_query_string(), "*:*");
    }

    #[tokio::test]
    async fn test_query_failure_is_surfaced() {
        let provider = Arc::new(MockProvider {
            fail_queries: true,
            ..Default::default()
        });
        let service = service_with(provider);

        assert!(matches!(
            service.search("Rust").await,
            Err(SearchIndexError::IndexQueryError(_))
        ));
    }

    #[tokio::test]
    async fn test_search_keeps_engine_order_and_drops_documents_without_id() {
        let results = vec![
            IndexDocument::from_fields(
                json!({ "id": ["65f1a2b3c4d5e6f708192a3c"], "course_name": ["Second"] })
                    .as_object()
                    .unwrap()
                    .clone(),
            ),
            IndexDocument::from_fields(
                json!({ "course_name": "No id" }).as_object().unwrap().clone(),
            ),
            IndexDocument::from_fields(
                json!({ "id": "65f1a2b3c4d5e6f708192a3b", "course_name": "First" })
                    .as_object()
                    .unwrap()
                    .clone(),
            ),
        ];
        let provider = Arc::new(MockProvider {
            results: Some(results),
            ..Default::default()
        });
        let service = service_with(provider);

        let found = service.search("anything").await.unwrap();
        let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }
}
