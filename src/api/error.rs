use crate::services::remover::RemovalError;
use crate::services::storage::StorageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Processing failed: {0}")]
    Processing(String),

    #[error("File Expired: {0}")]
    Gone(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl From<RemovalError> for AppError {
    fn from(e: RemovalError) -> Self {
        AppError::Processing(e.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(name) => AppError::Gone(name),
            StorageError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Processing(msg) => {
                tracing::error!("Processing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Processing failed: {msg}"),
                )
            }
            AppError::Gone(name) => {
                tracing::warn!("File swept before retrieval: {}", name);
                (StatusCode::GONE, "File expired.".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
