//! Solr core configuration.

use std::time::Duration;

use url::Url;

use crate::errors::SearchIndexError;

/// Default timeout for a single HTTP request to Solr.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default interval between liveness pings on an established connection.
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);

/// Location of the Solr core that holds the course index.
#[derive(Debug, Clone)]
pub struct SolrConfig {
    pub host: String,
    pub port: u16,
    /// Name of the core (collection) holding course documents.
    pub core: String,
    pub request_timeout: Duration,
    /// How often an established connection is pinged to detect loss.
    pub health_interval: Duration,
}

impl SolrConfig {
    /// Create a configuration with default timeouts.
    ///
    /// # Arguments
    ///
    /// * `host` - Solr host name
    /// * `port` - Solr HTTP port
    /// * `core` - Core name
    pub fn new(host: impl Into<String>, port: u16, core: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            core: core.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            health_interval: DEFAULT_HEALTH_INTERVAL,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_health_interval(mut self, interval: Duration) -> Self {
        self.health_interval = interval;
        self
    }

    /// Base URL of the core, e.g. `http://localhost:8983/solr/courses/`.
    ///
    /// The trailing slash lets endpoint paths be joined onto it.
    pub fn core_url(&self) -> Result<Url, SearchIndexError> {
        let raw = format!("http://{}:{}/solr/{}/", self.host, self.port, self.core);
        Url::parse(&raw)
            .map_err(|e| SearchIndexError::connection(format!("Invalid Solr URL {}: {}", raw, e)))
    }
}
