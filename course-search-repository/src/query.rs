//! Free-text query construction.

use crate::document::{FIELD_CATEGORY_NAME, FIELD_DESCRIPTION, FIELD_NAME};

/// Hard cap on the number of results returned by a search.
pub const MAX_RESULTS: usize = 100;

/// Fields matched by a free-text search, OR-combined.
pub const SEARCH_FIELDS: [&str; 3] = [FIELD_NAME, FIELD_DESCRIPTION, FIELD_CATEGORY_NAME];

/// Query matching every document.
const MATCH_ALL: &str = "*:*";

/// A free-text search over the course fields.
///
/// An empty text matches everything. Otherwise the text is escaped and
/// wrapped in wildcards, giving a case-sensitive substring match on each of
/// [`SEARCH_FIELDS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: Option<String>,
}

impl SearchQuery {
    pub fn new(text: &str) -> Self {
        Self {
            text: (!text.is_empty()).then(|| text.to_string()),
        }
    }

    pub fn match_all() -> Self {
        Self { text: None }
    }

    /// The raw, unescaped search text. `None` for a match-all query.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Maximum number of documents to return.
    pub fn rows(&self) -> usize {
        MAX_RESULTS
    }

    /// Render the query in the engine's query syntax.
    ///
    /// # Example
    ///
    /// ```
    /// use course_search_repository::SearchQuery;
    ///
    /// let query = SearchQuery::new("web dev");
    /// assert_eq!(
    ///     query.to_query_string(),
    ///     r"(course_name:*web\ dev* OR description:*web\ dev* OR category_name:*web\ dev*)"
    /// );
    /// assert_eq!(SearchQuery::new("").to_query_string(), "*:*");
    /// ```
    pub fn to_query_string(&self) -> String {
        match &self.text {
            None => MATCH_ALL.to_string(),
            Some(text) => {
                let escaped = escape_query_text(text);
                let clauses: Vec<String> = SEARCH_FIELDS
                    .iter()
                    .map(|field| format!("{}:*{}*", field, escaped))
                    .collect();
                format!("({})", clauses.join(" OR "))
            }
        }
    }
}

/// Escape characters that would otherwise change how the engine parses the
/// query: `:` starts a field clause and a space splits terms.
pub fn escape_query_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ':' || c == ' ' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
