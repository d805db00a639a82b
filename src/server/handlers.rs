//! HTTP request handlers.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::analysis::{AnalysisError, AnalysisSink};
use crate::llm::ApiKey;
use crate::models::{AnalysisRecord, AnalysisStats};

/// Header carrying a caller-supplied provider key.
pub const PROVIDER_KEY_HEADER: &str = "x-provider-key";
/// Header naming the owner of submitted documents.
pub const USER_HEADER: &str = "x-user-id";
/// Owner used when no `X-User-Id` header is sent.
pub const ANONYMOUS_USER: &str = "anonymous";
/// Longest provider key accepted from a caller.
pub const MAX_API_KEY_CHARS: usize = 200;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub page_count: usize,
    pub metadata: BTreeMap<String, String>,
}

/// Extract normalized text and document info from a PDF body.
pub async fn extract(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExtractResponse>, ApiError> {
    let extractor = state.analyzer.extractor();
    if !extractor.validate(&body) {
        return Err(AnalysisError::BadInput("Document is not a PDF file".to_string()).into());
    }

    let (text, info) = extractor
        .spawn_extract_with_info(body.to_vec())
        .await
        .map_err(AnalysisError::from)?;

    Ok(Json(ExtractResponse {
        text: text.into_string(),
        page_count: info.page_count,
        metadata: info.metadata,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub instructions: Option<String>,
}

/// Run the analysis pipeline over the PDF body and record the result.
///
/// The upload itself is never stored; only the finished analysis is.
pub async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalysisRecord>, ApiError> {
    if !state.analyzer.extractor().validate(&body) {
        return Err(AnalysisError::BadInput("Document is not a PDF file".to_string()).into());
    }

    let api_key = headers
        .get(PROVIDER_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(ApiKey::parse)
        .or_else(|| state.settings.llm.api_key.clone())
        .ok_or_else(|| AnalysisError::BadInput("No provider API key supplied".to_string()))?;
    if api_key.char_len() > MAX_API_KEY_CHARS {
        return Err(AnalysisError::BadInput(format!(
            "Provider API key must be at most {} characters",
            MAX_API_KEY_CHARS
        ))
        .into());
    }

    let user_id = user_id(&headers);
    let document_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        "Analyzing {} byte document {} with key {}",
        body.len(),
        document_id,
        api_key.redacted()
    );

    let result = state
        .analyzer
        .analyze(&body, &api_key, params.instructions.as_deref())
        .await?;

    let record = AnalysisRecord::new(&document_id, &user_id, result);
    state
        .store
        .save_analysis(&record)
        .await
        .map_err(AnalysisError::Storage)?;

    Ok(Json(record))
}

/// Analyses of the calling user, newest first.
pub async fn list_analyses(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Vec<AnalysisRecord>> {
    Json(state.store.analyses_for_user(&user_id(&headers)).await)
}

/// Aggregate statistics over the calling user's analyses.
pub async fn analysis_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<AnalysisStats> {
    let records = state.store.analyses_for_user(&user_id(&headers)).await;
    Json(AnalysisStats::compute(&records, Utc::now()))
}

fn user_id(headers: &HeaderMap) -> String {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS_USER)
        .to_string()
}
