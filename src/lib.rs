//! docsight - PDF text extraction and LLM-backed document analysis.
//!
//! The pipeline reads raw PDF bytes, normalizes the embedded text, asks an
//! OpenAI-compatible chat endpoint for a structured summary, and validates
//! the reply. A per-client fixed-window rate limiter guards the HTTP front.

pub mod analysis;
pub mod config;
pub mod extract;
pub mod llm;
pub mod models;
pub mod rate_limit;
pub mod server;

pub use analysis::{AnalysisConfig, AnalysisError, DocumentAnalyzer};
pub use config::Settings;
pub use extract::{ExtractedText, ExtractionError, PdfInfo, TextExtractor};
pub use llm::{AnalysisClient, ApiKey, LlmConfig, LlmError};
pub use models::{AnalysisRecord, AnalysisResult, AnalysisStats};
pub use rate_limit::{RateLimitConfig, RateLimitDecision, RateLimiter};
