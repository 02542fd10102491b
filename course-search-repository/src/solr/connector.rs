//! Connection management for Solr.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::connection::Connector;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::solr::config::SolrConfig;
use crate::solr::provider::SolrProvider;

/// Connects to a Solr core for a [`ConnectionGuard`](crate::connection::ConnectionGuard).
///
/// HTTP has no persistent transport to watch, so a connection counts as
/// established once the core answers a ping, and as lost as soon as a
/// periodic health ping fails.
pub struct SolrConnector {
    config: SolrConfig,
}

impl SolrConnector {
    pub fn new(config: SolrConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for SolrConnector {
    type Connection = Arc<dyn SearchIndexProvider>;
    type Error = SearchIndexError;

    async fn connect(&self) -> Result<Self::Connection, Self::Error> {
        let provider = SolrProvider::new(&self.config)?;
        provider.ping().await?;

        info!(core_url = %provider.core_url(), "Solr core reachable");
        Ok(Arc::new(provider))
    }

    async fn closed(&self, connection: &Self::Connection) {
        loop {
            sleep(self.config.health_interval).await;
            if let Err(e) = connection.ping().await {
                warn!(error = %e, "Solr health check failed");
                return;
            }
        }
    }
}
