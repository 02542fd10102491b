//! Core data structures for course records and their identifiers.

pub mod course_id;
pub mod course_record;

pub use course_id::CourseId;
pub use course_record::CourseRecord;
