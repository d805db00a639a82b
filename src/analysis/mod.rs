//! Document analysis pipeline.
//!
//! validate → extract → truncate → build prompt → call provider → parse.
//! The operation is all-or-nothing: every failure returns a classified
//! error and no partial result.

mod error;
pub mod store;
mod truncate;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use error::AnalysisError;
pub use store::{AnalysisSink, DocumentStore, InMemoryStore};
pub use truncate::{truncate_text, TRUNCATION_MARKER};

use crate::extract::{ExtractedText, TextExtractor};
use crate::llm::{build_analysis_prompt, parse_completion, AnalysisClient, ApiKey};
use crate::models::{AnalysisRecord, AnalysisResult};

/// Limits applied by the pipeline before any provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Character budget for document text in the prompt
    pub max_text_chars: usize,
    /// Maximum length of caller-supplied instructions
    pub max_instruction_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 8000,
            max_instruction_chars: 1000,
        }
    }
}

/// Composes extraction, prompting, the provider call and reply parsing.
#[derive(Clone)]
pub struct DocumentAnalyzer {
    extractor: TextExtractor,
    client: AnalysisClient,
    config: AnalysisConfig,
}

impl DocumentAnalyzer {
    pub fn new(client: AnalysisClient, config: AnalysisConfig) -> Self {
        Self {
            extractor: TextExtractor::new(),
            client,
            config,
        }
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    /// Analyze raw PDF bytes.
    pub async fn analyze(
        &self,
        bytes: &[u8],
        api_key: &ApiKey,
        instructions: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        if !self.extractor.validate(bytes) {
            return Err(AnalysisError::BadInput(
                "Document is not a PDF file".to_string(),
            ));
        }
        self.check_instructions(instructions)?;

        let text = self.extractor.spawn_extract(bytes.to_vec()).await?;
        self.analyze_text(&text, api_key, instructions).await
    }

    /// Analyze text that has already been extracted.
    pub async fn analyze_text(
        &self,
        text: &ExtractedText,
        api_key: &ApiKey,
        instructions: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.check_instructions(instructions)?;
        if text.is_empty() {
            return Err(AnalysisError::BadInput("Document text is empty".to_string()));
        }

        let limited = truncate_text(text.as_str(), self.config.max_text_chars);
        debug!(
            "Text length: {} chars, after truncation: {} chars",
            text.char_len(),
            limited.chars().count()
        );

        let prompt = build_analysis_prompt(&limited, instructions);
        let body = self.client.complete(&prompt, api_key).await?;
        let result = parse_completion(&body)?;

        info!("Analysis complete: {} topics", result.topics.len());
        Ok(result)
    }

    /// Analyze a stored document and hand the result to `sink`.
    ///
    /// Reuses text cached in `store`; otherwise extracts it from the raw
    /// bytes and saves it back before calling the provider.
    pub async fn analyze_stored(
        &self,
        store: &dyn DocumentStore,
        sink: &dyn AnalysisSink,
        document_id: &str,
        user_id: &str,
        api_key: &ApiKey,
        instructions: Option<&str>,
    ) -> Result<AnalysisRecord, AnalysisError> {
        self.check_instructions(instructions)?;

        let cached = store
            .extracted_text(document_id, user_id)
            .await
            .map_err(AnalysisError::Storage)?;

        let text = match cached {
            Some(text) => ExtractedText::from_raw(&text),
            None => {
                let bytes = store
                    .raw_bytes(document_id, user_id)
                    .await
                    .map_err(AnalysisError::Storage)?
                    .ok_or_else(|| AnalysisError::NotFound(document_id.to_string()))?;
                if !self.extractor.validate(&bytes) {
                    return Err(AnalysisError::BadInput(
                        "Document is not a PDF file".to_string(),
                    ));
                }
                let text = self.extractor.spawn_extract(bytes).await?;
                store
                    .save_extracted_text(document_id, text.as_str())
                    .await
                    .map_err(AnalysisError::Storage)?;
                text
            }
        };

        info!("Analyzing document {}", document_id);
        let result = self.analyze_text(&text, api_key, instructions).await?;

        let record = AnalysisRecord::new(document_id, user_id, result);
        sink.save_analysis(&record)
            .await
            .map_err(AnalysisError::Storage)?;

        info!("Stored analysis {} for document {}", record.id, document_id);
        Ok(record)
    }

    fn check_instructions(&self, instructions: Option<&str>) -> Result<(), AnalysisError> {
        let len = instructions.map(|s| s.chars().count()).unwrap_or(0);
        if len > self.config.max_instruction_chars {
            return Err(AnalysisError::BadInput(format!(
                "Custom instructions must be at most {} characters",
                self.config.max_instruction_chars
            )));
        }
        Ok(())
    }
}
