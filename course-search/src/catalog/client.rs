//! HTTP client for the course catalog API.

use std::time::Duration;

use async_trait::async_trait;
use course_search_shared::{CourseId, CourseRecord};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::catalog::CatalogSource;
use crate::errors::SyncError;

/// Catalog client backed by reqwest.
///
/// Courses are read from `GET {base_url}/{id}`, the full listing from
/// `GET {base_url}/`.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Catalog base URL; a trailing slash is ignored
    /// * `timeout` - Timeout applied to every request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::upstream(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::upstream(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SyncError::upstream(format!(
                "Catalog returned status {} for {}",
                status, url
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::upstream(format!("Failed to read body from {}: {}", url, e)))?;

        Ok(body.to_vec())
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    #[instrument(skip(self), fields(course_id = %id))]
    async fn fetch_course(&self, id: &CourseId) -> Result<CourseRecord, SyncError> {
        let url = format!("{}/{}", self.base_url, id);
        let body = self.get(&url).await?;

        let course: CourseRecord = serde_json::from_slice(&body)
            .map_err(|e| SyncError::upstream(format!("Malformed course {}: {}", id, e)))?;

        debug!("Fetched course from catalog");
        Ok(course)
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<CourseRecord>, SyncError> {
        let url = format!("{}/", self.base_url);
        let body = self.get(&url).await?;

        let items: Vec<Value> = serde_json::from_slice(&body)
            .map_err(|e| SyncError::upstream(format!("Malformed course listing: {}", e)))?;

        let total = items.len();
        let courses: Vec<CourseRecord> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(course) => Some(course),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed course in listing");
                    None
                }
            })
            .collect();

        debug!(total, decoded = courses.len(), "Fetched course listing");
        Ok(courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode as HttpStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    const COURSE_ID: &str = "65a1b2c3d4e5f60718293a4b";

    async fn fetch_one(Path(id): Path<String>) -> impl IntoResponse {
        match id.as_str() {
            COURSE_ID => (
                HttpStatus::OK,
                Json(json!({
                    "_id": COURSE_ID,
                    "course_name": "Rust Basics",
                    "description": "Ownership and borrowing",
                    "price": 49.5,
                    "duration": 12,
                    "init_date": "2024-03-01",
                    "state": true,
                    "capacity": 30,
                    "image": "rust.png",
                    "category_id": "65a1b2c3d4e5f60718293a4c",
                    "category_name": "Programming",
                    "ratingavg": 4.5
                })),
            )
                .into_response(),
            "65a1b2c3d4e5f60718293a4d" => (HttpStatus::OK, "not json").into_response(),
            _ => (HttpStatus::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
        }
    }

    async fn fetch_listing() -> Json<Value> {
        Json(json!([
            {"_id": COURSE_ID, "course_name": "Rust Basics"},
            {"_id": "bad-id", "course_name": "Broken"},
            {"course_name": "No id"},
            {"_id": "65a1b2c3d4e5f60718293a4e", "course_name": "Go Basics", "ratingavg": null}
        ]))
    }

    async fn spawn_catalog() -> String {
        let app = Router::new()
            .route("/courses/", get(fetch_listing))
            .route("/courses/:id", get(fetch_one));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/courses", addr)
    }

    fn client(base_url: &str) -> CatalogClient {
        CatalogClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = client("http://localhost:4002/courses/");
        assert_eq!(client.base_url(), "http://localhost:4002/courses");
    }

    #[tokio::test]
    async fn test_fetch_course() {
        let client = client(&spawn_catalog().await);
        let id: CourseId = COURSE_ID.parse().unwrap();

        let course = client.fetch_course(&id).await.unwrap();

        assert_eq!(course.id, id);
        assert_eq!(course.name, "Rust Basics");
        assert_eq!(course.capacity, 30);
        assert!(course.active);
        assert_eq!(course.category_name, "Programming");
    }

    #[tokio::test]
    async fn test_fetch_course_not_found_is_upstream_error() {
        let client = client(&spawn_catalog().await);
        let id: CourseId = "65a1b2c3d4e5f60718293aff".parse().unwrap();

        let result = client.fetch_course(&id).await;

        assert!(matches!(result, Err(SyncError::UpstreamError(_))));
    }

    #[tokio::test]
    async fn test_fetch_course_malformed_body_is_upstream_error() {
        let client = client(&spawn_catalog().await);
        let id: CourseId = "65a1b2c3d4e5f60718293a4d".parse().unwrap();

        let result = client.fetch_course(&id).await;

        assert!(matches!(result, Err(SyncError::UpstreamError(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_skips_malformed_items() {
        let client = client(&spawn_catalog().await);

        let courses = client.fetch_all().await.unwrap();

        let names: Vec<_> = courses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Rust Basics", "Go Basics"]);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_upstream_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(&format!("http://{}", addr));
        let result = client.fetch_all().await;

        assert!(matches!(result, Err(SyncError::UpstreamError(_))));
    }
}
