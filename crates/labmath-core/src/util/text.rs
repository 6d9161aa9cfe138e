//! Text helpers for bounded, human-readable status messages.

/// Truncate `text` to at most `max_chars` characters.
///
/// Counts characters rather than bytes, so multi-byte text is never split
/// inside a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
