//! Solr provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using Solr's JSON update and select handlers over `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};
use url::Url;

use crate::document::IndexDocument;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::query::SearchQuery;
use crate::solr::config::SolrConfig;

/// Body of a `/select` response.
#[derive(Debug, Deserialize)]
struct SelectResponse {
    response: SelectResults,
}

#[derive(Debug, Deserialize)]
struct SelectResults {
    #[serde(rename = "numFound", default)]
    num_found: u64,
    #[serde(default)]
    docs: Vec<IndexDocument>,
}

/// Solr provider implementation.
///
/// Each method performs exactly one HTTP round trip; retries are the caller's
/// decision.
///
/// # Example
///
/// ```ignore
/// let provider = SolrProvider::new(&SolrConfig::new("localhost", 8983, "courses"))?;
/// provider.ping().await?;
/// provider.add_documents(&[IndexDocument::from(&record)]).await?;
/// provider.commit().await?;
/// ```
#[derive(Debug, Clone)]
pub struct SolrProvider {
    client: Client,
    core_url: Url,
}

impl SolrProvider {
    /// Create a provider for the core described by `config`.
    ///
    /// No request is made; use [`ping`](SearchIndexProvider::ping) to check reachability.
    pub fn new(config: &SolrConfig) -> Result<Self, SearchIndexError> {
        let core_url = config.core_url()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(core_url = %core_url, "Created Solr provider");

        Ok(Self { client, core_url })
    }

    pub fn core_url(&self) -> &Url {
        &self.core_url
    }

    fn endpoint(&self, path: &str) -> Url {
        // The core URL always ends in '/', so joining a relative path cannot fail.
        self.core_url
            .join(path)
            .unwrap_or_else(|_| self.core_url.clone())
    }

    /// Read the body of a non-success response for error reporting.
    async fn failure_body(response: Response) -> String {
        response.text().await.unwrap_or_default()
    }

    async fn post_update(
        &self,
        body: &serde_json::Value,
        operation: &str,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .post(self.endpoint("update"))
            .query(&[("wt", "json")])
            .json(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::write(format!("{} request failed: {}", operation, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = Self::failure_body(response).await;
            error!(status = %status, body = %error_body, operation, "Update request failed");
            return Err(SearchIndexError::write(format!(
                "{} failed with status {}: {}",
                operation, status, error_body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl SearchIndexProvider for SolrProvider {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .get(self.endpoint("admin/ping"))
            .query(&[("wt", "json")])
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = Self::failure_body(response).await;
            return Err(SearchIndexError::connection(format!(
                "Ping failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(())
    }

    async fn add_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_value(documents)
            .map_err(|e| SearchIndexError::write(format!("Failed to serialize documents: {}", e)))?;
        self.post_update(&body, "Add").await?;

        debug!(count = documents.len(), "Documents submitted");
        Ok(())
    }

    async fn commit(&self) -> Result<(), SearchIndexError> {
        self.post_update(&json!({ "commit": {} }), "Commit").await?;
        debug!("Commit completed");
        Ok(())
    }

    async fn select(&self, query: &SearchQuery) -> Result<Vec<IndexDocument>, SearchIndexError> {
        let q = query.to_query_string();
        let rows = query.rows().to_string();

        debug!(q = %q, rows = %rows, "Executing Solr query");

        let response = self
            .client
            .get(self.endpoint("select"))
            .query(&[("q", q.as_str()), ("rows", rows.as_str()), ("wt", "json")])
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = Self::failure_body(response).await;
            error!(status = %status, body = %error_body, q = %q, "Select request failed");
            return Err(SearchIndexError::query(format!(
                "Select failed with status {}: {}",
                status, error_body
            )));
        }

        let parsed: SelectResponse = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(format!("Malformed select response: {}", e)))?;

        debug!(
            num_found = parsed.response.num_found,
            returned = parsed.response.docs.len(),
            "Solr query completed"
        );

        Ok(parsed.response.docs)
    }
}
