//! # Course Search Shared
//!
//! This crate defines the course data structures shared across the course search
//! service: the validated catalog identifier and the course record as published by
//! the upstream catalog.

pub mod types;

pub use types::course_id::{CourseId, InvalidCourseId};
pub use types::course_record::CourseRecord;
