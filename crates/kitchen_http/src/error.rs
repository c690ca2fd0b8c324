//! API error type and its JSON response mapping.
//!
//! Every handler returns `Result<T, ApiError>`. The body is always
//! `{ "error": <kind>, "message": <text>, "field": <optional> }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kitchen_core::{DbError, RepoError, ServiceError};
use log::error;
use serde::Serialize;
use thiserror::Error;

/// Application-level error type for the HTTP adapter.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Use-case failure (not found, validation, conflict, unauthenticated).
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Opening or migrating the database failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Request could not be decoded.
    #[error("Bad request: {message}")]
    BadRequest {
        field: &'static str,
        message: String,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(field: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            field,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Conflict { .. } => StatusCode::CONFLICT,
                ServiceError::Repo(_) | ServiceError::InconsistentState(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Service(err) => err.kind(),
            Self::BadRequest { .. } => "validation",
            Self::Database(_) | Self::Internal(_) => "internal",
        }
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            Self::Service(err) => err.field(),
            Self::BadRequest { field, .. } => Some(field),
            Self::Database(_) | Self::Internal(_) => None,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Service(value.into())
    }
}

/// Error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("event=http_error module=http status=error error={self}");
            "Internal server error".to_string()
        } else {
            match &self {
                Self::Service(err) => err.to_string(),
                Self::BadRequest { message, .. } => message.clone(),
                Self::Database(_) | Self::Internal(_) => self.to_string(),
            }
        };

        let body = ErrorBody {
            error: self.kind(),
            message,
            field: self.field(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_core::{EntityKind, ValidationError};
    use uuid::Uuid;

    #[test]
    fn test_service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                ServiceError::NotFound {
                    entity: EntityKind::Cook,
                    id: Uuid::new_v4(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Validation(ValidationError::InvalidPage),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Conflict {
                    field: "username",
                    value: "chef".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::InconsistentState("lost row"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_bad_request_carries_field() {
        let err = ApiError::bad_request("page", "page must be a number");
        assert_eq!(err.field(), Some("page"));
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
