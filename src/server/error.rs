//! Mapping of pipeline errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::llm::LlmError;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}

/// An error ready to be rendered as a response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            status_code: self.status.as_u16(),
            message: self.message.clone(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        let status = match &err {
            AnalysisError::BadInput(_) => StatusCode::BAD_REQUEST,
            AnalysisError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalysisError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::Llm(LlmError::InvalidCredential) => StatusCode::UNAUTHORIZED,
            AnalysisError::Llm(LlmError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            AnalysisError::Llm(LlmError::ProviderRateLimited) => StatusCode::SERVICE_UNAVAILABLE,
            AnalysisError::Llm(LlmError::AnalysisFailed(_))
            | AnalysisError::Llm(LlmError::MalformedResponse(_)) => StatusCode::BAD_GATEWAY,
            AnalysisError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", err);
        } else {
            tracing::warn!("Request rejected: {}", err);
        }

        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionError;

    fn status_of(err: AnalysisError) -> StatusCode {
        ApiError::from(err).status
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(AnalysisError::BadInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AnalysisError::PayloadTooLarge { size: 2, limit: 1 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(ExtractionError::Empty.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(LlmError::InvalidCredential.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(LlmError::ProviderRateLimited.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(LlmError::MalformedResponse("x".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AnalysisError::NotFound("d".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_body_shape() {
        let body = ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "too big").body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["statusCode"], 413);
        assert_eq!(json["message"], "too big");
        assert_eq!(json["error"], "Payload Too Large");
    }
}
