//! Engine-facing projection of course records.
//!
//! An [`IndexDocument`] is a flat field map. Documents are produced from
//! [`CourseRecord`]s on write and decoded back on read. Decoding is tolerant:
//! the engine may return any field as a bare scalar or as a single-element
//! array (multi-valued schema fields), and missing fields decode to zero values.

use course_search_shared::{CourseId, CourseRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SearchIndexError;

pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "course_name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_DURATION: &str = "duration";
pub const FIELD_START_DATE: &str = "init_date";
pub const FIELD_ACTIVE: &str = "state";
pub const FIELD_CAPACITY: &str = "capacity";
pub const FIELD_IMAGE: &str = "image";
pub const FIELD_CATEGORY_ID: &str = "category_id";
pub const FIELD_CATEGORY_NAME: &str = "category_name";
pub const FIELD_RATING_AVG: &str = "ratingavg";

/// A document as stored in and returned by the search engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexDocument {
    fields: Map<String, Value>,
}

impl IndexDocument {
    /// Build a document from raw engine fields.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw field value, as returned by the engine.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The document key, if present.
    pub fn id(&self) -> Option<String> {
        self.string_field(FIELD_ID)
    }

    /// Decode the document back into a course record.
    ///
    /// # Returns
    ///
    /// * `Ok(CourseRecord)` - With zero values for any missing field
    /// * `Err(SearchIndexError::ValidationError)` - If the `id` field is missing or malformed
    pub fn to_record(&self) -> Result<CourseRecord, SearchIndexError> {
        let raw_id = self.id().unwrap_or_default();
        let id = CourseId::parse(&raw_id).map_err(|e| {
            SearchIndexError::validation(format!("Document without valid id: {}", e))
        })?;

        let category_id = self
            .string_field(FIELD_CATEGORY_ID)
            .and_then(|value| CourseId::parse(&value).ok());

        Ok(CourseRecord {
            id,
            name: self.string_field(FIELD_NAME).unwrap_or_default(),
            description: self.string_field(FIELD_DESCRIPTION).unwrap_or_default(),
            price: self.f64_field(FIELD_PRICE),
            duration: self.u32_field(FIELD_DURATION),
            start_date: self.string_field(FIELD_START_DATE).unwrap_or_default(),
            active: self.bool_field(FIELD_ACTIVE),
            capacity: self.u32_field(FIELD_CAPACITY),
            image: self.string_field(FIELD_IMAGE).unwrap_or_default(),
            category_id,
            category_name: self.string_field(FIELD_CATEGORY_NAME).unwrap_or_default(),
            rating_avg: self.f64_field(FIELD_RATING_AVG),
        })
    }

    fn scalar(&self, field: &str) -> Option<&Value> {
        match self.fields.get(field)? {
            Value::Array(values) => values.first(),
            value => Some(value),
        }
    }

    fn string_field(&self, field: &str) -> Option<String> {
        self.scalar(field)?.as_str().map(str::to_string)
    }

    fn f64_field(&self, field: &str) -> f64 {
        self.scalar(field).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// Integer fields may come back as floats; the fraction is dropped and
    /// negative values clamp to zero.
    fn u32_field(&self, field: &str) -> u32 {
        self.scalar(field)
            .and_then(Value::as_f64)
            .map(|n| n as u32)
            .unwrap_or(0)
    }

    fn bool_field(&self, field: &str) -> bool {
        self.scalar(field).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl From<&CourseRecord> for IndexDocument {
    fn from(record: &CourseRecord) -> Self {
        let mut fields = Map::new();
        fields.insert(FIELD_ID.to_string(), Value::from(record.id.as_str()));
        fields.insert(FIELD_NAME.to_string(), Value::from(record.name.as_str()));
        fields.insert(
            FIELD_DESCRIPTION.to_string(),
            Value::from(record.description.as_str()),
        );
        fields.insert(FIELD_PRICE.to_string(), Value::from(record.price));
        fields.insert(FIELD_DURATION.to_string(), Value::from(record.duration));
        fields.insert(
            FIELD_START_DATE.to_string(),
            Value::from(record.start_date.as_str()),
        );
        fields.insert(FIELD_ACTIVE.to_string(), Value::from(record.active));
        fields.insert(FIELD_CAPACITY.to_string(), Value::from(record.capacity));
        fields.insert(FIELD_IMAGE.to_string(), Value::from(record.image.as_str()));
        fields.insert(
            FIELD_CATEGORY_ID.to_string(),
            Value::from(record.category_id.as_ref().map(CourseId::as_str).unwrap_or("")),
        );
        fields.insert(
            FIELD_CATEGORY_NAME.to_string(),
            Value::from(record.category_name.as_str()),
        );
        fields.insert(FIELD_RATING_AVG.to_string(), Value::from(record.rating_avg));
        Self { fields }
    }
}
