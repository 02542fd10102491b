//! Catalog identifiers.
//!
//! The catalog keys courses and categories with 12-byte object ids rendered as
//! 24 hexadecimal digits. A record without a well-formed id cannot be indexed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hex digits in a catalog identifier.
const ID_HEX_LEN: usize = 24;

/// Error returned when a string is not a well-formed catalog identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid course id {value:?}: expected 24 hex digits")]
pub struct InvalidCourseId {
    pub value: String,
}

/// A validated catalog identifier, stored in lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId(String);

impl CourseId {
    /// Parse and normalize an identifier.
    ///
    /// Surrounding whitespace is ignored and uppercase digits are accepted. The
    /// all-zero id is the catalog's null value and is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use course_search_shared::CourseId;
    ///
    /// let id = CourseId::parse("65F1A2B3C4D5E6F708192A3B").unwrap();
    /// assert_eq!(id.as_str(), "65f1a2b3c4d5e6f708192a3b");
    /// assert!(CourseId::parse("not-an-id").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, InvalidCourseId> {
        let trimmed = value.trim();
        if trimmed.len() != ID_HEX_LEN
            || !trimmed.chars().all(|c| c.is_ascii_hexdigit())
            || trimmed.chars().all(|c| c == '0')
        {
            return Err(InvalidCourseId {
                value: value.to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CourseId {
    type Err = InvalidCourseId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CourseId {
    type Error = InvalidCourseId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
