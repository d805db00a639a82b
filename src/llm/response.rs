//! Parsing of provider replies into analysis results.
//!
//! The provider is asked for JSON but may wrap it in conversational prose.
//! The span from the first `{` to the last `}` is taken greedily and must
//! decode to an object with a non-empty `summary` and a non-empty `topics`
//! list. Anything else is a hard failure; there is no partial result.

use serde::Deserialize;
use serde_json::Value;

use super::LlmError;
use crate::models::AnalysisResult;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    summary: Option<String>,
    topics: Option<Vec<String>>,
    insights: Option<Value>,
}

/// Parse a raw chat-completion body into an [`AnalysisResult`].
pub fn parse_completion(body: &str) -> Result<AnalysisResult, LlmError> {
    let content = message_content(body)?;
    parse_analysis(&content)
}

/// Pull `choices[0].message.content` out of a completion body.
pub fn message_content(body: &str) -> Result<String, LlmError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::MalformedResponse(format!("Invalid completion body: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| LlmError::MalformedResponse("Empty reply from provider".to_string()))
}

/// Greedy outer-brace match: first `{` through last `}`.
pub fn extract_json_span(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&content[start..=end])
}

/// Validate the reply text and build an [`AnalysisResult`].
pub fn parse_analysis(content: &str) -> Result<AnalysisResult, LlmError> {
    let span = extract_json_span(content)
        .ok_or_else(|| LlmError::MalformedResponse("No JSON object in reply".to_string()))?;

    let raw: RawAnalysis = serde_json::from_str(span)
        .map_err(|e| LlmError::MalformedResponse(format!("Invalid analysis JSON: {}", e)))?;

    let summary = raw
        .summary
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| LlmError::MalformedResponse("Missing summary".to_string()))?;

    let topics = raw
        .topics
        .filter(|t| !t.is_empty())
        .ok_or_else(|| LlmError::MalformedResponse("Missing topics list".to_string()))?;

    let insights = match raw.insights {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    };

    Ok(AnalysisResult {
        summary,
        topics,
        insights,
    })
}
