use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    dto::envelope::{ApiResponse, NoData},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed client input.
    #[error("{message}")]
    InvalidInput {
        message: String,
        cause: Option<String>,
    },
    /// Referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The store failed, was unreachable, or did not answer in time.
    #[error("{message}")]
    Persistence {
        message: String,
        #[source]
        source: StorageError,
    },
}

impl ServiceError {
    /// Invalid input carrying the lower-level reason it was rejected.
    pub fn invalid(message: impl Into<String>, cause: impl ToString) -> Self {
        ServiceError::InvalidInput {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Wrap a storage failure behind a stable, user-facing summary.
    pub fn persistence(message: impl Into<String>) -> impl FnOnce(StorageError) -> Self {
        let message = message.into();
        move |source| ServiceError::Persistence { message, source }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::invalid("invalid request format", err)
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{message}")]
    BadRequest {
        message: String,
        cause: Option<String>,
    },
    /// Requested resource not found.
    #[error("{message}")]
    NotFound {
        message: String,
        cause: Option<String>,
    },
    /// Internal server error.
    #[error("{message}")]
    Internal {
        message: String,
        cause: Option<String>,
    },
}

impl AppError {
    /// 404 for paths no route matches.
    pub fn unknown_route(method: &str, path: &str) -> Self {
        AppError::NotFound {
            message: "endpoint not found; see /api/info for the available endpoints".into(),
            cause: Some(format!("{method} {path}")),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput { message, cause } => AppError::BadRequest { message, cause },
            ServiceError::NotFound(message) => AppError::NotFound {
                message,
                cause: None,
            },
            ServiceError::Persistence { message, source } => AppError::Internal {
                message,
                cause: Some(source.to_string()),
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: "invalid request format".into(),
            cause: Some(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: "invalid query parameters".into(),
            cause: Some(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest {
            message: "invalid path parameter".into(),
            cause: Some(rejection.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = match self {
            AppError::BadRequest { message, cause }
            | AppError::NotFound { message, cause }
            | AppError::Internal { message, cause } => {
                ApiResponse::<NoData>::failure(message, cause)
            }
        };

        (status, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn persistence_errors_keep_summary_and_cause_apart() {
        let err = ServiceError::persistence("failed to load game state")(StorageError::Timeout {
            operation: "find player state",
            after: Duration::from_secs(10),
        });

        match AppError::from(err) {
            AppError::Internal { message, cause } => {
                assert_eq!(message, "failed to load game state");
                assert_eq!(
                    cause.as_deref(),
                    Some("storage operation `find player state` timed out after 10000ms")
                );
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        let bad: AppError = ServiceError::invalid("invalid request format", "userId").into();
        let missing: AppError = ServiceError::NotFound("game state not found".into()).into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::unknown_route("GET", "/nope").status(),
            StatusCode::NOT_FOUND
        );
    }
}
