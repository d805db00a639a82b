//! Configuration management.
//!
//! Settings come from an optional TOML or JSON file, then environment
//! variables override individual values. Every field has a default, so an
//! empty environment yields a working configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::llm::LlmConfig;
use crate::rate_limit::RateLimitConfig;

/// Default bind address for `serve`.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port for `serve`.
pub const DEFAULT_PORT: u16 = 3000;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Complete runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmConfig,
    pub analysis: AnalysisConfig,
    pub rate_limit: RateLimitConfig,
    pub server: ServerConfig,
    /// File the settings were read from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `path` (if given) and the process environment.
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::default(),
        };
        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Parse a settings file. The format follows the extension; anything
    /// other than `.json` is read as TOML.
    pub async fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let mut settings: Settings = match ext {
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config {}", path.display()))?,
            _ => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config {}", path.display()))?,
        };

        settings.source_path = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Unparseable numeric values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.llm.apply_env(&lookup);

        let number = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(n) = number("MAX_TEXT_LENGTH") {
            self.analysis.max_text_chars = n as usize;
        }
        if let Some(n) = number("MAX_INSTRUCTIONS_LENGTH") {
            self.analysis.max_instruction_chars = n as usize;
        }
        if let Some(n) = number("RATE_LIMIT_WINDOW_MS") {
            self.rate_limit.window_ms = n;
        }
        if let Some(n) = number("RATE_LIMIT_MAX_REQUESTS").and_then(|n| u32::try_from(n).ok()) {
            self.rate_limit.max_requests = n;
        }
        if let Some(n) = number("MAX_REQUEST_BYTES") {
            self.rate_limit.max_request_bytes = n;
        }
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = number("PORT").and_then(|n| u16::try_from(n).ok()) {
            self.server.port = port;
        }
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
