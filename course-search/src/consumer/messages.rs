//! Wire format of course-update messages.
//!
//! A message body is the id of the changed course, either bare
//! (`65a1b2c3d4e5f60718293a4b`) or as a JSON string (`"65a1..."`).

use course_search_shared::CourseId;

/// Decode a delivery payload into the id of the changed course.
///
/// Returns `None` for payloads that are not UTF-8 or do not hold a valid id.
pub fn decode_course_update(payload: &[u8]) -> Option<CourseId> {
    let text = std::str::from_utf8(payload).ok()?.trim();
    let text = text
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text);

    CourseId::parse(text).ok()
}
