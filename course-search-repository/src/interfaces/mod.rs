//! Seams between the index service and the search engine transport.

mod search_index_provider;

pub use search_index_provider::SearchIndexProvider;
