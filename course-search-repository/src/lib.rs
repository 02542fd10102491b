//! # Course Search Repository
//!
//! This crate owns everything between the course search service and the search
//! engine: connection lifecycle with readiness signalling, the provider
//! interface, a Solr implementation, the record/document projection, and the
//! high-level [`SearchIndexService`].

pub mod connection;
pub mod document;
pub mod errors;
pub mod interfaces;
pub mod query;
pub mod service;
pub mod solr;

pub use connection::{ConnectionGuard, ConnectionState, Connector};
pub use document::IndexDocument;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use query::{SearchQuery, MAX_RESULTS};
pub use service::{SearchConnection, SearchIndexService};
pub use solr::{SolrConfig, SolrConnector, SolrProvider};
