//! Character-budget truncation ahead of prompt building.

/// Appended when the text is cut without a nearby paragraph break.
pub const TRUNCATION_MARKER: &str = "...";

const PARAGRAPH_BREAK: &str = "\n\n";

/// Limit `text` to `max_chars` characters.
///
/// Text that fits is returned unchanged. Otherwise the first `max_chars`
/// characters are taken; if the last paragraph break in that window starts
/// at or after 80% of the budget the text is cut there with no marker,
/// else it is cut at the budget and [`TRUNCATION_MARKER`] is appended.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let cut = match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => byte_idx,
        None => return text.to_string(),
    };
    let window = &text[..cut];

    if let Some(byte_pos) = window.rfind(PARAGRAPH_BREAK) {
        let char_pos = window[..byte_pos].chars().count();
        // char_pos >= 0.8 * max_chars, in integers
        if char_pos * 5 >= max_chars * 4 {
            return window[..byte_pos].to_string();
        }
    }

    let mut truncated = String::with_capacity(cut + TRUNCATION_MARKER.len());
    truncated.push_str(window);
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
