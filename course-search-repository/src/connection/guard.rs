//! Readiness-tracking connection guard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::connection::Connector;

/// Default delay between connection attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Observable state of a guarded connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection and no attempt in progress.
    Disconnected,
    /// A connection attempt is in progress.
    Connecting,
    /// The connection is established and usable.
    Ready,
}

/// State and connection handle, kept together so readers never see a `Ready`
/// state without its handle.
#[derive(Debug, Clone)]
enum Link<T> {
    Disconnected,
    Connecting,
    Ready(T),
}

impl<T: Clone> Link<T> {
    fn state(&self) -> ConnectionState {
        match self {
            Link::Disconnected => ConnectionState::Disconnected,
            Link::Connecting => ConnectionState::Connecting,
            Link::Ready(_) => ConnectionState::Ready,
        }
    }

    fn connection(&self) -> Option<T> {
        match self {
            Link::Ready(connection) => Some(connection.clone()),
            _ => None,
        }
    }
}

/// Owns the connection lifecycle of one external dependency.
///
/// Construction never blocks: the guard starts `Disconnected` and only begins
/// connecting once [`start`](Self::start) spawns its retry loop. Every state
/// change goes through a single watch channel, so a transition to `Ready`
/// wakes all tasks parked in [`await_ready`](Self::await_ready) at once.
///
/// # Example
///
/// ```ignore
/// let guard = Arc::new(ConnectionGuard::new("solr"));
/// let handle = guard.start(SolrConnector::new(config));
///
/// // Blocks until the first successful connection.
/// let provider = guard.await_ready().await;
/// ```
pub struct ConnectionGuard<T> {
    name: String,
    link: watch::Sender<Link<T>>,
    shutdown: watch::Sender<bool>,
    retry_interval: Duration,
}

impl<T> ConnectionGuard<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a disconnected guard that retries every [`DEFAULT_RETRY_INTERVAL`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_retry_interval(name, DEFAULT_RETRY_INTERVAL)
    }

    /// Create a disconnected guard with a custom retry interval.
    pub fn with_retry_interval(name: impl Into<String>, retry_interval: Duration) -> Self {
        let (link, _) = watch::channel(Link::Disconnected);
        let (shutdown, _) = watch::channel(false);
        Self {
            name: name.into(),
            link,
            shutdown,
            retry_interval,
        }
    }

    /// Wrap a connection that is already established.
    ///
    /// No retry loop is attached; the guard stays `Ready` until shut down.
    pub fn established(name: impl Into<String>, connection: T) -> Self {
        let guard = Self::new(name);
        guard.link.send_replace(Link::Ready(connection));
        guard
    }

    /// Name of the guarded dependency, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ConnectionState {
        self.link.borrow().state()
    }

    /// Non-blocking readiness check.
    pub fn is_ready(&self) -> bool {
        self.state() == ConnectionState::Ready
    }

    /// The current connection handle, if ready.
    pub fn connection(&self) -> Option<T> {
        self.link.borrow().connection()
    }

    /// Wait until the connection is ready and return its handle.
    ///
    /// Returns immediately when already ready. Safe to call from any number of
    /// tasks, and before [`start`](Self::start). Returns `None` once the guard
    /// has been shut down.
    pub async fn await_ready(&self) -> Option<T> {
        let mut link = self.link.subscribe();
        let mut shutdown = self.shutdown.subscribe();

        loop {
            if let Some(connection) = link.borrow_and_update().connection() {
                return Some(connection);
            }
            if *shutdown.borrow_and_update() {
                return None;
            }

            tokio::select! {
                changed = link.changed() => {
                    if changed.is_err() {
                        return None;
                    }
                }
                _ = shutdown.changed() => {}
            }
        }
    }

    /// Spawn the retry loop that connects through `connector`.
    ///
    /// The loop runs until [`shutdown`](Self::shutdown) is called. Failed
    /// attempts and lost connections are retried after the retry interval,
    /// with no upper bound on the number of attempts.
    pub fn start<C>(self: &Arc<Self>, connector: C) -> JoinHandle<()>
    where
        C: Connector<Connection = T>,
    {
        let guard = Arc::clone(self);
        tokio::spawn(async move { guard.run(connector).await })
    }

    /// Ask the retry loop to stop and release the connection.
    ///
    /// Cooperative: the loop observes the request at its next wake-up.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Whether [`shutdown`](Self::shutdown) has been requested.
    pub fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Resolves once [`shutdown`](Self::shutdown) has been requested.
    pub async fn shutdown_requested(&self) {
        let mut shutdown = self.shutdown.subscribe();
        while !*shutdown.borrow_and_update() {
            if shutdown.changed().await.is_err() {
                return;
            }
        }
    }

    /// Delay between connection attempts.
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    #[instrument(skip_all, fields(dependency = %self.name))]
    async fn run<C>(&self, connector: C)
    where
        C: Connector<Connection = T>,
    {
        let mut shutdown = self.shutdown.subscribe();
        let retry_interval_secs = self.retry_interval.as_secs_f64();

        while !*shutdown.borrow_and_update() {
            self.link.send_replace(Link::Connecting);
            debug!("Attempting connection");

            let attempt = tokio::select! {
                result = connector.connect() => result,
                _ = shutdown.changed() => break,
            };

            match attempt {
                Ok(connection) => {
                    self.link.send_replace(Link::Ready(connection.clone()));
                    info!("Connection established");

                    let lost = tokio::select! {
                        _ = connector.closed(&connection) => true,
                        _ = shutdown.changed() => false,
                    };

                    // Flip state before releasing so in-flight callers fail fast.
                    self.link.send_replace(Link::Disconnected);

                    if !lost {
                        connector.release(connection).await;
                        break;
                    }

                    warn!(retry_interval_secs, "Connection lost, reconnecting...");
                }
                Err(e) => {
                    self.link.send_replace(Link::Disconnected);
                    warn!(
                        error = %e,
                        retry_interval_secs,
                        "Failed to connect, retrying..."
                    );
                }
            }

            tokio::select! {
                _ = sleep(self.retry_interval) => {}
                _ = shutdown.changed() => {}
            }
        }

        self.link.send_replace(Link::Disconnected);
        info!("Connection loop stopped");
    }
}
