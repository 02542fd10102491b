//! Connector trait definition.

use async_trait::async_trait;
use std::fmt::Display;

/// Establishes and monitors connections to one external dependency.
///
/// Implementations are driven by [`ConnectionGuard`](super::ConnectionGuard),
/// which calls `connect` until it succeeds, then waits on `closed` to learn
/// that the connection was lost.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Handle shared with dependent components once the connection is ready.
    type Connection: Clone + Send + Sync + 'static;

    /// Error reported by a failed connection attempt.
    type Error: Display + Send;

    /// Make one connection attempt.
    ///
    /// The returned connection must be fully usable (channels opened, queues
    /// declared) since readiness is broadcast as soon as this returns.
    async fn connect(&self) -> Result<Self::Connection, Self::Error>;

    /// Resolve once `connection` is lost.
    async fn closed(&self, connection: &Self::Connection);

    /// Release the underlying transport on shutdown.
    async fn release(&self, _connection: Self::Connection) {}
}
