//! Shared helper functions for CLI commands.

use std::path::Path;

use anyhow::Context;

/// Read a document from disk.
pub async fn read_document(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Truncate a string to at most `max_chars` characters for display.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
