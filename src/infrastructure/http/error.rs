//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::PipelineError;

/// Error response body: `{error, details}`
///
/// Short message plus a details string; no stack traces or file paths.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API errors
#[derive(Debug)]
pub enum ApiError {
    /// No story could be served at all
    ServiceUnavailable(String),
    /// Story generation failed
    Internal { error: String, details: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(error = %msg, "Service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: msg,
                        details: None,
                    },
                )
            }
            ApiError::Internal { error, details } => {
                tracing::error!(error = %error, details = %details, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error,
                        details: Some(details),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Internal {
            error: "Failed to generate story".to_string(),
            details: e.to_string(),
        }
    }
}
