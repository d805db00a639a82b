//! Error taxonomy of the analysis pipeline.

use thiserror::Error;

use crate::extract::ExtractionError;
use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input rejected before any processing (non-PDF bytes, over-long
    /// instructions, missing credential).
    #[error("Bad input: {0}")]
    BadInput(String),

    #[error("Payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    /// A collaborator (document store or persistence sink) failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AnalysisError {
    /// Whether the caller should present this as "try again later".
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalysisError::Llm(LlmError::ProviderRateLimited))
    }
}
