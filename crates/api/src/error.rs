//! Error types for the API harness

use thiserror::Error;

use crate::transport::Method;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out: {method} {path}")]
    Timeout { method: Method, path: String },

    #[error("Schema validation failed: {0}")]
    Validation(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Timeout,
    Validation,
    Status,
    Transport,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Timeout { .. } => ApiErrorKind::Timeout,
            ApiError::Validation(_) | ApiError::InvalidSchema(_) | ApiError::Json(_) => {
                ApiErrorKind::Validation
            }
            ApiError::UnexpectedStatus { .. } => ApiErrorKind::Status,
            ApiError::Http(e) if e.is_timeout() => ApiErrorKind::Timeout,
            ApiError::Transport(_) | ApiError::Url(_) | ApiError::Http(_) => {
                ApiErrorKind::Transport
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ApiErrorKind::Timeout
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ApiErrorKind::Validation
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
