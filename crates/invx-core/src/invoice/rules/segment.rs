//! Anchor-based segmentation.

/// Return the text strictly between the first `start_marker` and the first
/// `end_marker`.
///
/// Empty when either marker is missing, or when the end marker does not come
/// after the start marker.
pub fn segment<'a>(text: &'a str, start_marker: &str, end_marker: &str) -> &'a str {
    let (Some(start), Some(end)) = (text.find(start_marker), text.find(end_marker)) else {
        return "";
    };

    let from = start + start_marker.len();
    if end < from {
        return "";
    }

    &text[from..end]
}
