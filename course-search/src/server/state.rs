use std::sync::Arc;

use crate::config::BrokerConnection;
use crate::orchestrator::SyncCoordinator;

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SyncCoordinator>,
    pub broker: Arc<BrokerConnection>,
    /// Expected value of the `Authorization` header.
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(
        coordinator: Arc<SyncCoordinator>,
        broker: Arc<BrokerConnection>,
        api_key: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            coordinator,
            broker,
            api_key: api_key.into(),
        }
    }
}
