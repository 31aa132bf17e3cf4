//! Live Error Types
//!
//! Live-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Upstream failures normally never reach this type: the cache serves the
//! last value and the snapshot is marked degraded instead. Only a section the
//! snapshot cannot do without, with nothing cached, becomes an error.

use crate::domain::entity::FeedCategory;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::FetchError;
use thiserror::Error;

/// Live-specific result type alias
pub type LiveResult<T> = Result<T, LiveError>;

#[derive(Debug, Error)]
pub enum LiveError {
    /// Explicitly requested session does not exist upstream
    #[error("Session {0} not found")]
    SessionNotFound(u32),

    /// A required feed failed and nothing was cached for it
    #[error("{category} feed unavailable: {source}")]
    CategoryUnavailable {
        category: FeedCategory,
        #[source]
        source: FetchError,
    },

    /// Car number neither on the roster nor in the session
    #[error("Unknown driver: car {0}")]
    UnknownDriver(u32),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LiveError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LiveError::SessionNotFound(_) | LiveError::UnknownDriver(_) => StatusCode::NOT_FOUND,
            LiveError::CategoryUnavailable { source, .. } if source.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            LiveError::CategoryUnavailable { .. } => StatusCode::BAD_GATEWAY,
            LiveError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            LiveError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LiveError::SessionNotFound(_) | LiveError::UnknownDriver(_) => ErrorKind::NotFound,
            LiveError::CategoryUnavailable { source, .. } if source.is_timeout() => {
                ErrorKind::GatewayTimeout
            }
            LiveError::CategoryUnavailable { .. } => ErrorKind::BadGateway,
            LiveError::InvalidRequest(_) => ErrorKind::BadRequest,
            LiveError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            LiveError::CategoryUnavailable { category, source } => {
                tracing::warn!(%category, error = %source, "Live feed unavailable");
            }
            LiveError::Internal(msg) => {
                tracing::error!(message = %msg, "Live internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Live error");
            }
        }
    }
}

impl From<LiveError> for AppError {
    fn from(err: LiveError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            LiveError::CategoryUnavailable { source, .. } => AppError::new(kind, message)
                .with_action("Retry in a few seconds")
                .with_source(source),
            _ => AppError::new(kind, message),
        }
    }
}

impl IntoResponse for LiveError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
