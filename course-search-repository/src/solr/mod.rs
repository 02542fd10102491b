//! Solr implementation of the search index provider.
//!
//! Talks to a single Solr core over its JSON HTTP API:
//! - `GET  {core}/admin/ping` for readiness and liveness
//! - `POST {core}/update` for document submission and commits
//! - `GET  {core}/select` for queries

mod config;
mod connector;
mod provider;

pub use config::SolrConfig;
pub use connector::SolrConnector;
pub use provider::SolrProvider;
