//! Error types for the course search repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
