//! API error types with structured JSON responses.
//!
//! Only transport-level and request-shape failures surface here. Business
//! outcomes — low confidence, empty table, guardrail rejection — are
//! regular 200 payloads defined by the endpoint contracts.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::summarize::SummarizeError;
use crate::service::ServiceError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Upstream model call failed: {0}")]
    Upstream(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Upstream(detail) => {
                tracing::warn!(detail, "upstream model call failed");
                (StatusCode::BAD_GATEWAY, "UPSTREAM", detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::ImageDecode(detail) => ApiError::BadRequest(detail),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<SummarizeError> for ApiError {
    fn from(err: SummarizeError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Extraction(e) => e.into(),
            ServiceError::Summarize(e) => e.into(),
        }
    }
}
