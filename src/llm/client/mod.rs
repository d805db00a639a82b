//! Analysis client for OpenAI-compatible chat-completion APIs.
//!
//! Retries once, after a fixed backoff, when the provider answers 429 or
//! 5xx. The retried request is identical to the first one.

mod config;
mod prompts;

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use config::LlmConfig;
pub use prompts::{build_analysis_prompt, SYSTEM_PROMPT};

use super::credential::ApiKey;
use super::transport::{ChatMessage, ChatRequest, ChatTransport, HttpTransport, TransportError};

/// Retries allowed after the first attempt.
const MAX_RETRIES: u32 = 1;

/// Errors from the analysis provider, classified on the final attempt.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Invalid or expired provider API key")]
    InvalidCredential,

    #[error("Provider rate limit exceeded, try again in a few minutes")]
    ProviderRateLimited,

    #[error("Provider rejected the request: {0}")]
    InvalidRequest(String),

    #[error("Analysis request failed: {0}")]
    AnalysisFailed(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl From<TransportError> for LlmError {
    fn from(e: TransportError) -> Self {
        LlmError::AnalysisFailed(e.to_string())
    }
}

/// Client performing one logical analysis call per invocation.
#[derive(Clone)]
pub struct AnalysisClient {
    config: LlmConfig,
    transport: Arc<dyn ChatTransport>,
}

impl AnalysisClient {
    /// Create a client posting to the configured endpoint.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let transport = HttpTransport::new(config.endpoint.clone(), config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: LlmConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Build the chat request for a prompt.
    pub fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Send a prompt and return the raw completion body.
    pub async fn complete(&self, prompt: &str, api_key: &ApiKey) -> Result<String, LlmError> {
        let request = self.build_request(prompt);

        info!(
            "Sending analysis request to {} (model: {}, key: {}, prompt: {} chars)",
            self.config.provider_name(),
            self.config.model,
            api_key.redacted(),
            prompt.chars().count()
        );

        let mut attempt = 0;
        loop {
            let response = self.transport.send(&request, api_key).await?;

            if response.status.is_success() {
                debug!("Provider answered {} on attempt {}", response.status, attempt + 1);
                return Ok(response.body);
            }

            if is_retryable(response.status) && attempt < MAX_RETRIES {
                let wait = self.config.retry_backoff();
                warn!(
                    "Provider returned {} (attempt {}), retrying in {:?}",
                    response.status,
                    attempt + 1,
                    wait
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
                continue;
            }

            warn!("Provider returned {} after {} attempt(s)", response.status, attempt + 1);
            return Err(classify_status(response.status, &response.body));
        }
    }
}

/// 429 and server errors are worth one more attempt.
pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Map a final failure status to an error kind.
pub fn classify_status(status: StatusCode, body: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED => LlmError::InvalidCredential,
        StatusCode::TOO_MANY_REQUESTS => LlmError::ProviderRateLimited,
        StatusCode::BAD_REQUEST => LlmError::InvalidRequest(snippet(body)),
        other => LlmError::AnalysisFailed(format!("HTTP {}: {}", other, snippet(body))),
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let mut s: String = body.chars().take(MAX).collect();
        s.push_str("...");
        s
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm::transport::TransportResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport replaying scripted responses and recording requests.
    pub(crate) struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
        requests: Mutex<Vec<ChatRequest>>,
        keys: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(
            responses: Vec<Result<TransportResponse, TransportError>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
                keys: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub(crate) fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub(crate) fn keys(&self) -> Vec<String> {
            self.keys.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(
            &self,
            request: &ChatRequest,
            api_key: &ApiKey,
        ) -> Result<TransportResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.keys.lock().unwrap().push(api_key.expose().to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".into())))
        }
    }

    pub(crate) fn reply(status: u16, body: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        })
    }

    pub(crate) fn completion_body(content: &str) -> String {
        serde_json::json!({ "choices": [{ "message": { "content": content } }] }).to_string()
    }

    pub(crate) fn test_config() -> LlmConfig {
        LlmConfig {
            retry_backoff_ms: 0,
            ..Default::default()
        }
    }

    fn client(transport: Arc<ScriptedTransport>) -> AnalysisClient {
        AnalysisClient::with_transport(test_config(), transport)
    }

    fn key() -> ApiKey {
        ApiKey::new("gsk_test_key")
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let transport = ScriptedTransport::new(vec![reply(200, "ok-body")]);
        let body = client(transport.clone()).complete("prompt", &key()).await.unwrap();
        assert_eq!(body, "ok-body");
        assert_eq!(transport.calls(), 1);
        assert_eq!(transport.keys(), vec!["gsk_test_key"]);
    }

    #[tokio::test]
    async fn test_retries_once_on_503_then_succeeds() {
        let transport = ScriptedTransport::new(vec![reply(503, "busy"), reply(200, "ok")]);
        let body = client(transport.clone()).complete("prompt", &key()).await.unwrap();
        assert_eq!(body, "ok");
        assert_eq!(transport.calls(), 2);

        let requests = transport.requests();
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_waits_for_default_backoff() {
        let transport = ScriptedTransport::new(vec![reply(503, "busy"), reply(200, "ok")]);
        let client = AnalysisClient::with_transport(LlmConfig::default(), transport.clone());

        let started = tokio::time::Instant::now();
        let body = client.complete("prompt", &key()).await.unwrap();

        assert_eq!(body, "ok");
        assert_eq!(transport.calls(), 2);
        assert!(started.elapsed() >= std::time::Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_does_not_wait() {
        let transport = ScriptedTransport::new(vec![reply(200, "ok")]);
        let client = AnalysisClient::with_transport(LlmConfig::default(), transport);

        let started = tokio::time::Instant::now();
        client.complete("prompt", &key()).await.unwrap();

        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_two_503s_fail_without_third_call() {
        let transport = ScriptedTransport::new(vec![
            reply(503, "busy"),
            reply(503, "still busy"),
            reply(200, "never reached"),
        ]);
        let err = client(transport.clone())
            .complete("prompt", &key())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AnalysisFailed(_)));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_two_429s_are_provider_rate_limited() {
        let transport = ScriptedTransport::new(vec![reply(429, ""), reply(429, "")]);
        let err = client(transport.clone())
            .complete("prompt", &key())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ProviderRateLimited));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_429_then_500_is_analysis_failed() {
        let transport = ScriptedTransport::new(vec![reply(429, ""), reply(500, "boom")]);
        let err = client(transport.clone())
            .complete("prompt", &key())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AnalysisFailed(_)));
        assert_eq!(transport.calls(), 2);
    }

    fn kind(err: &LlmError) -> &'static str {
        match err {
            LlmError::InvalidCredential => "credential",
            LlmError::ProviderRateLimited => "rate_limited",
            LlmError::InvalidRequest(_) => "request",
            LlmError::AnalysisFailed(_) => "failed",
            LlmError::MalformedResponse(_) => "malformed",
        }
    }

    #[tokio::test]
    async fn test_non_retryable_statuses_surface_immediately() {
        for (status, expected) in [
            (401, "credential"),
            (400, "request"),
            (403, "failed"),
            (404, "failed"),
        ] {
            let transport = ScriptedTransport::new(vec![reply(status, "nope"), reply(200, "ok")]);
            let err = client(transport.clone())
                .complete("prompt", &key())
                .await
                .unwrap_err();
            assert_eq!(kind(&err), expected, "status {}", status);
            assert_eq!(transport.calls(), 1, "status {} must not retry", status);
        }
    }

    #[tokio::test]
    async fn test_transport_errors_not_retried() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Timeout), reply(200, "ok")]);
        let err = client(transport.clone())
            .complete("prompt", &key())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AnalysisFailed(_)));
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_build_request() {
        let client = client(ScriptedTransport::new(vec![]));
        let request = client.build_request("the prompt");
        assert_eq!(request.model, LlmConfig::default().model);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "the prompt");
        assert_eq!(request.max_tokens, 2000);
    }

    #[test]
    fn test_error_messages_do_not_leak_body_unbounded() {
        let long = "x".repeat(1000);
        match classify_status(StatusCode::BAD_GATEWAY, &long) {
            LlmError::AnalysisFailed(msg) => assert!(msg.len() < 300),
            other => panic!("unexpected {:?}", other),
        }
    }
}
