//! Course records as published by the upstream catalog.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::course_id::CourseId;

/// A course as served by the catalog and stored in the search index.
///
/// Field names on the wire follow the catalog's JSON shape. Every field except
/// `_id` is optional on input and falls back to its zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(rename = "_id")]
    pub id: CourseId,
    #[serde(rename = "course_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// Duration in the catalog's unit.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u32,
    /// Start date, passed through in the catalog's format.
    #[serde(rename = "init_date", default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(rename = "state", default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient_category_id")]
    pub category_id: Option<CourseId>,
    /// Denormalized copy of the category name; may be empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_name: String,
    #[serde(rename = "ratingavg", default, deserialize_with = "null_as_default")]
    pub rating_avg: f64,
}

impl CourseRecord {
    /// Create a record with the given id and zero values everywhere else.
    pub fn new(id: CourseId) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            price: 0.0,
            duration: 0,
            start_date: String::new(),
            active: false,
            capacity: 0,
            image: String::new(),
            category_id: None,
            category_name: String::new(),
            rating_avg: 0.0,
        }
    }
}

/// An explicit `null` decodes as the zero value, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A missing, empty or malformed category id decodes as `None`.
fn lenient_category_id<'de, D>(deserializer: D) -> Result<Option<CourseId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| CourseId::parse(&value).ok()))
}
