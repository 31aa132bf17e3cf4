//! Season Error Types
//!
//! Season-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::FetchError;
use thiserror::Error;

/// Season-specific result type alias
pub type SeasonResult<T> = Result<T, SeasonError>;

#[derive(Debug, Error)]
pub enum SeasonError {
    /// Provider failed and nothing was cached
    #[error("{resource} unavailable: {source}")]
    Unavailable {
        resource: &'static str,
        #[source]
        source: FetchError,
    },

    /// Round, driver or result set the provider does not know
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SeasonError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SeasonError::Unavailable { source, .. } if source.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            SeasonError::Unavailable { .. } => StatusCode::BAD_GATEWAY,
            SeasonError::NotFound(_) => StatusCode::NOT_FOUND,
            SeasonError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SeasonError::Unavailable { source, .. } if source.is_timeout() => ErrorKind::GatewayTimeout,
            SeasonError::Unavailable { .. } => ErrorKind::BadGateway,
            SeasonError::NotFound(_) => ErrorKind::NotFound,
            SeasonError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            SeasonError::Unavailable { resource, source } => {
                tracing::warn!(resource, error = %source, "Season data unavailable");
            }
            SeasonError::NotFound(what) => {
                tracing::debug!(what = %what, "Season resource not found");
            }
            SeasonError::Internal(msg) => {
                tracing::error!(message = %msg, "Season internal error");
            }
        }
    }
}

impl From<SeasonError> for AppError {
    fn from(err: SeasonError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            SeasonError::Unavailable { source, .. } => AppError::new(kind, message)
                .with_action("Retry later")
                .with_source(source),
            SeasonError::NotFound(_) | SeasonError::Internal(_) => AppError::new(kind, message),
        }
    }
}

impl IntoResponse for SeasonError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
