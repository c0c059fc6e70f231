// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StoreError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username taken")]
    UsernameTaken,

    #[error("Password must be longer than {} chars", .min_length.saturating_sub(1))]
    PasswordTooShort { min_length: usize },

    #[error("Username required")]
    MissingUsername,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("bad credentials")]
    InvalidCredentials,

    #[error("You shall not pass!")]
    Unauthorized,

    #[error("Authentication rate limit exceeded")]
    AuthRateLimited,

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UsernameTaken
            | AppError::PasswordTooShort { .. }
            | AppError::MissingUsername => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::AuthRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "VAL_001",
            AppError::UsernameTaken => "VAL_002",
            AppError::PasswordTooShort { .. } => "VAL_003",
            AppError::MissingUsername => "VAL_004",
            AppError::InvalidCredentials => "AUTH_001",
            AppError::Unauthorized => "AUTH_002",
            AppError::AuthRateLimited => "AUTH_003",
            AppError::Store(_) => "STORE_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Message safe to hand to the client
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::UsernameTaken
            | AppError::PasswordTooShort { .. }
            | AppError::MissingUsername
            | AppError::InvalidCredentials
            | AppError::Unauthorized => self.to_string(),
            AppError::InvalidInput(_) => "Invalid request format".to_string(),
            AppError::AuthRateLimited => {
                "Too many failed login attempts, please try again later".to_string()
            },
            AppError::Store(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code = error_code, "request failed: {}", self);
        } else {
            tracing::debug!(code = error_code, "request rejected: {}", self);
        }

        let body = serde_json::json!({
            "message": self.sanitized_message(),
            "code": error_code,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(_) => AppError::UsernameTaken,
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
