//! LLM integration for structured document analysis.
//!
//! Talks to an OpenAI-compatible chat-completion endpoint (Groq by default).

mod client;
pub mod credential;
pub mod response;
pub mod transport;

pub use client::{
    build_analysis_prompt, classify_status, is_retryable, AnalysisClient, LlmConfig, LlmError,
    SYSTEM_PROMPT,
};
pub use credential::ApiKey;
pub use response::parse_completion;
pub use transport::{ChatTransport, HttpTransport};

#[cfg(test)]
pub(crate) use client::tests as client_tests;
