use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

/// Service-level failure. Converts into the `(StatusCode, String)` rejection
/// every handler returns; 5xx detail stays in the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("credential hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => Self::Conflict(format!("{field} already registered")),
            other => Self::Store(other),
        }
    }
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(format!("{resource} not found"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Hashing(_) | Self::Store(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AppError> for (StatusCode, String) {
    fn from(e: AppError) -> Self {
        let status = e.status();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            error!(error = %e, "request failed");
            (status, "Internal server error".into())
        } else {
            (status, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn storage_detail_is_not_leaked() {
        let (status, body) =
            <(StatusCode, String)>::from(AppError::from(StoreError::Timeout(Duration::from_secs(5))));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }

    #[test]
    fn duplicate_rows_are_conflicts() {
        let (status, body) =
            <(StatusCode, String)>::from(AppError::from(StoreError::Duplicate("teacherID")));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, "teacherID already registered");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let (status, body) = <(StatusCode, String)>::from(AppError::not_found("Student"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Student not found");

        let (status, _) = <(StatusCode, String)>::from(AppError::bad_request("nope"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
