//! Analysis provider configuration.
//!
//! Env vars (ANALYSIS_* preferred, GROQ_* accepted as fallback):
//! ANALYSIS_API_URL, ANALYSIS_MODEL, ANALYSIS_TIMEOUT_SECS, GROQ_API_KEY

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::credential::ApiKey;

/// Configuration for the chat-completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Full chat-completions URL
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature (kept low for reproducible analyses)
    pub temperature: f32,
    /// Maximum tokens in the reply
    pub max_tokens: u32,
    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,
    /// Fixed wait before the single retry, in milliseconds
    pub retry_backoff_ms: u64,
    /// Fallback key used when a caller supplies none. Never serialized.
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: 0.3,
            max_tokens: 2000,
            timeout_secs: 30,
            retry_backoff_ms: 2000,
            api_key: None,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| names.iter().find_map(|name| lookup(name));

        if let Some(endpoint) = first(&["ANALYSIS_API_URL", "GROQ_API_URL"]) {
            self.endpoint = endpoint;
        }
        if let Some(model) = first(&["ANALYSIS_MODEL", "GROQ_MODEL"]) {
            self.model = model;
        }
        if let Some(secs) = lookup("ANALYSIS_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(key) = first(&["ANALYSIS_API_KEY", "GROQ_API_KEY"]) {
            self.api_key = ApiKey::parse(&key);
        }
    }

    /// Provider name for display.
    pub fn provider_name(&self) -> &'static str {
        if self.endpoint.contains("groq.com") {
            "Groq"
        } else if self.endpoint.contains("openai.com") {
            "OpenAI"
        } else if self.endpoint.contains("together.xyz") {
            "Together.ai"
        } else {
            "OpenAI-compatible"
        }
    }
}
