use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::{repo::StoreError, services::AccountError};

/// Errors surfaced at the HTTP boundary. Every variant maps to one status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Incorrect username or password")]
    NoMatch,
    #[error("{0}")]
    DuplicateKey(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateKey(_) => StatusCode::BAD_REQUEST,
            AppError::NoMatch => StatusCode::UNAUTHORIZED,
            AppError::StoreUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_detail(&self) -> String {
        match self {
            AppError::StoreUnavailable(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => AppError::StoreUnavailable(err.to_string()),
            StoreError::DuplicateKey { .. } => AppError::DuplicateKey(err.to_string()),
            StoreError::ValueTooLong => AppError::Validation(err.to_string()),
            StoreError::Query(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => AppError::Validation(msg),
            AccountError::DuplicateKey { .. } => AppError::DuplicateKey(err.to_string()),
            AccountError::Hashing(e) => AppError::Internal(e.to_string()),
            AccountError::Store(e) => e.into(),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(ErrorBody { detail: self.public_detail() })).into_response()
    }
}
