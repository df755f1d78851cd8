//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use voyage_core::relay::RelayError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Message shown for failures the caller cannot act on.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request body is not a valid chat payload.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl AppError {
    /// Status code and caller-facing message.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::MalformedRequest(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR.to_string())
            }
            AppError::Relay(e) => {
                let status = match e {
                    RelayError::MissingConfiguration(_) | RelayError::Unexpected(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    RelayError::Upstream { status, .. } => {
                        StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                    }
                    RelayError::EmptyCompletion => StatusCode::BAD_GATEWAY,
                };
                (status, e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        (status, Json(ErrorResponse { error })).into_response()
    }
}
