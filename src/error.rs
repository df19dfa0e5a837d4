use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::message::ErrorResponse;

/// Failures surfaced by the conversation service and its collaborators.
#[derive(Error, Debug)]
pub enum ChatError {
    /// No appointment backs the requested conversation.
    #[error("Appointment not found")]
    NotFound,

    /// The caller is not the participant its role claims.
    #[error("Unauthorized access")]
    Unauthorized,

    /// The request itself is unusable (empty text, missing file, ...).
    #[error("{0}")]
    InvalidArgument(String),

    /// The object store rejected or lost the upload.
    #[error("File upload failed: {0}")]
    Upload(String),

    /// The message store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Writing into a conversation whose appointment was cancelled.
    #[error("Appointment is cancelled")]
    Conflict,
}

impl ChatError {
    fn status(&self) -> StatusCode {
        match self {
            ChatError::NotFound => StatusCode::NOT_FOUND,
            ChatError::Unauthorized => StatusCode::FORBIDDEN,
            ChatError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ChatError::Conflict => StatusCode::CONFLICT,
            ChatError::Upload(_) | ChatError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text handed to clients. Upload and storage details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ChatError::Upload(_) => "File upload failed".to_string(),
            ChatError::Storage(_) => "Failed to access message storage".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        if let ChatError::Upload(detail) | ChatError::Storage(detail) = &self {
            error!("chat operation failed: {}", detail);
        }
        let body = Json(ErrorResponse::new(self.public_message()));
        (self.status(), body).into_response()
    }
}
