//! Connection lifecycle management for external dependencies.
//!
//! A [`ConnectionGuard`] owns the connection to one dependency (search engine,
//! message broker) and keeps it alive with an unbounded retry loop driven by a
//! [`Connector`]. Dependent code reads readiness snapshots or awaits readiness
//! through the guard instead of touching the transport directly.

mod connector;
mod guard;

pub use connector::Connector;
pub use guard::{ConnectionGuard, ConnectionState, DEFAULT_RETRY_INTERVAL};
