use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Nothing here is fatal to the process: a failed request surfaces its error
/// and leaves the registry and other in-flight requests untouched.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Malformed patient data in {path}: {reason}")]
    MalformedInput { path: String, reason: String },

    #[error("Completion failure: {0}")]
    Completion(#[from] LlmError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::UnknownTemplate(id) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_TEMPLATE",
                format!("Unknown template: {id}"),
            ),
            AppError::MalformedInput { path, reason } => (
                StatusCode::BAD_REQUEST,
                "MALFORMED_INPUT",
                format!("Malformed patient data in {path}: {reason}"),
            ),
            AppError::Completion(e) => {
                tracing::error!("Completion failure: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "COMPLETION_FAILURE",
                    "The completion service failed to produce a result".to_string(),
                )
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
