//! Text extraction and document info commands.

use std::path::Path;

use console::style;

use docsight::extract::TextExtractor;

use super::super::helpers::{read_document, truncate};

/// Print the normalized text of a PDF.
pub async fn cmd_extract(file: &Path) -> anyhow::Result<()> {
    let bytes = read_document(file).await?;
    let extractor = TextExtractor::new();
    if !extractor.validate(&bytes) {
        anyhow::bail!("{} is not a PDF file", file.display());
    }

    let text = extractor.extract(&bytes)?;
    println!("{}", text);
    Ok(())
}

/// Show page count and metadata of a PDF.
pub async fn cmd_info(file: &Path, json: bool) -> anyhow::Result<()> {
    let bytes = read_document(file).await?;
    let extractor = TextExtractor::new();
    if !extractor.validate(&bytes) {
        anyhow::bail!("{} is not a PDF file", file.display());
    }

    let info = extractor.info(&bytes)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("\n{}", style(file.display()).bold());
    println!("{}", "-".repeat(50));
    println!("  {:<15} {}", "Pages", info.page_count);
    println!("  {:<15} {} bytes", "Size", bytes.len());
    for (key, value) in &info.metadata {
        println!("  {:<15} {}", key, truncate(value, 60));
    }

    match extractor.extract(&bytes) {
        Ok(text) => println!(
            "  {:<15} {} chars",
            "Text",
            style(text.char_len()).cyan()
        ),
        Err(e) => println!("  {:<15} {}", "Text", style(e).yellow()),
    }

    Ok(())
}
