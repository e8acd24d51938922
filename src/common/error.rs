use crate::common::response::ApiError;
use crate::common::upload::UploadError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Failures answered synchronously on the originating request.
///
/// Fetch and encoder failures never show up here: they happen after the
/// request has already returned a job id and are recorded on the job instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// Carries the limit in bytes.
    #[error("File too large. Maximum size is {}.", human_limit(.0))]
    PayloadTooLarge(u64),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Internal server error")]
    Io(#[from] std::io::Error),
}

const MIB: u64 = 1024 * 1024;

/// Whole megabytes rounded up, or bytes for limits under one megabyte.
fn human_limit(bytes: &u64) -> String {
    if *bytes < MIB {
        format!("{} bytes", bytes)
    } else {
        format!("{}MB", bytes.div_ceil(MIB))
    }
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::PayloadTooLarge(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::InvalidType(_) => AppError::validation(e.to_string()),
            UploadError::TooLarge { limit } => AppError::PayloadTooLarge(limit),
            UploadError::Stream(message) => AppError::Validation(message),
            UploadError::Io(e) => AppError::Io(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(e) => tracing::error!("Unhandled error: {:#}", e),
            AppError::Io(e) => tracing::error!("Unhandled I/O error: {}", e),
            _ => {}
        }

        ApiError(self.to_string(), self.status_code()).into_response()
    }
}
