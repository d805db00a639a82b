//! Whitespace normalization for extracted PDF text.

use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n?").expect("valid line break pattern"));

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid whitespace pattern"));

/// Normalize raw extracted text.
///
/// The passes run in a fixed order: line endings become `\n`, runs of three
/// or more newlines collapse to a paragraph break, runs of spaces and tabs
/// collapse to one space, and the result is trimmed. Reordering them changes
/// the output for mixed line endings.
pub fn normalize(raw: &str) -> String {
    let text = LINE_BREAKS.replace_all(raw, "\n");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    text.trim().to_string()
}
