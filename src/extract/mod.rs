//! Text extraction from PDF bytes.
//!
//! Extraction is a one-shot, synchronous read of caller-owned bytes. Decode
//! failures are terminal: malformed input does not become valid on retry.

mod normalize;
mod pdf;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub use normalize::normalize;

/// Magic marker every PDF file starts with.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Errors from text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to decode PDF: {0}")]
    Decode(String),

    #[error("PDF contains no extractable text")]
    Empty,
}

/// Normalized text extracted from a document.
///
/// Holds no carriage returns, no more than one consecutive blank line, no
/// runs of horizontal whitespace and no leading or trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Normalize raw text into an `ExtractedText`.
    pub fn from_raw(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Page count and document-info metadata of a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PdfInfo {
    pub page_count: usize,
    pub metadata: BTreeMap<String, String>,
}

/// Stateless PDF text extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Cheap header sniff: true iff the bytes start with `%PDF`.
    pub fn validate(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(PDF_MAGIC)
    }

    /// Extract and normalize the text layer of a PDF.
    pub fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let document = pdf::load(bytes)?;
        text_of(&document, bytes.len())
    }

    /// Read page count and the document-info dictionary.
    pub fn info(&self, bytes: &[u8]) -> Result<PdfInfo, ExtractionError> {
        let document = pdf::load(bytes)?;
        Ok(info_of(&document))
    }

    /// Decode once and return both the text and the document info.
    pub fn extract_with_info(
        &self,
        bytes: &[u8],
    ) -> Result<(ExtractedText, PdfInfo), ExtractionError> {
        let document = pdf::load(bytes)?;
        let info = info_of(&document);
        Ok((text_of(&document, bytes.len())?, info))
    }

    /// [`extract`](Self::extract) on the blocking thread pool.
    pub async fn spawn_extract(&self, bytes: Vec<u8>) -> Result<ExtractedText, ExtractionError> {
        let extractor = *self;
        run_blocking(move || extractor.extract(&bytes)).await
    }

    /// [`extract_with_info`](Self::extract_with_info) on the blocking thread pool.
    pub async fn spawn_extract_with_info(
        &self,
        bytes: Vec<u8>,
    ) -> Result<(ExtractedText, PdfInfo), ExtractionError> {
        let extractor = *self;
        run_blocking(move || extractor.extract_with_info(&bytes)).await
    }
}

fn text_of(document: &lopdf::Document, size: usize) -> Result<ExtractedText, ExtractionError> {
    debug!("Extracting text from {} byte document", size);

    let raw = pdf::page_text(document)?;
    let text = ExtractedText::from_raw(&raw);
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }

    info!("Extracted {} characters of text", text.char_len());
    Ok(text)
}

fn info_of(document: &lopdf::Document) -> PdfInfo {
    PdfInfo {
        page_count: document.get_pages().len(),
        metadata: pdf::info_metadata(document),
    }
}

/// Run `f` on the blocking pool. A decoder panic surfaces as a decode failure.
async fn run_blocking<T, F>(f: F) -> Result<T, ExtractionError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ExtractionError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractionError::Decode(format!("Extraction task failed: {}", e)))?
}
