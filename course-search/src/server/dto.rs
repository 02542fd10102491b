//! Response bodies.

use course_search_shared::CourseRecord;
use serde::{Deserialize, Serialize};

/// A course as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_name: String,
    pub description: String,
    pub price: f64,
    pub duration: u32,
    pub init_date: String,
    pub state: bool,
    pub capacity: u32,
    pub image: String,
    /// Empty when the course has no category.
    pub category_id: String,
    pub category_name: String,
    pub ratingavg: f64,
}

impl From<CourseRecord> for CourseDto {
    fn from(record: CourseRecord) -> Self {
        Self {
            id: record.id.into(),
            course_name: record.name,
            description: record.description,
            price: record.price,
            duration: record.duration,
            init_date: record.start_date,
            state: record.active,
            capacity: record.capacity,
            image: record.image,
            category_id: record.category_id.map(String::from).unwrap_or_default(),
            category_name: record.category_name,
            ratingavg: record.rating_avg,
        }
    }
}

/// Body of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCoursesResponse {
    pub courses: Vec<CourseDto>,
}

impl From<Vec<CourseRecord>> for SearchCoursesResponse {
    fn from(records: Vec<CourseRecord>) -> Self {
        Self {
            courses: records.into_iter().map(CourseDto::from).collect(),
        }
    }
}
