//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{repositories::StoreError, validation::FieldViolation};

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No record matches the request
    #[error("Not found: {0}")]
    NotFound(&'static str),

    /// One or more fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    /// Backing storage did not answer its health probe
    #[error("Service unavailable")]
    ServiceUnavailable,

    /// Storage error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// A single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldViolation::new(field, message)])
    }

    pub fn movie_not_found() -> Self {
        ApiError::NotFound("Movie not found")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid("body", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::invalid("id", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid("query", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, json!({ "detail": detail })),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "detail": "Validation failed", "errors": errors }),
            ),
            ApiError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "detail": "Service unavailable" }),
            ),
            ApiError::Store(StoreError::Conflict(id)) => (
                StatusCode::CONFLICT,
                json!({ "detail": format!("Movie with id {} already exists", id) }),
            ),
            ApiError::Store(StoreError::IdsExhausted) => (
                StatusCode::CONFLICT,
                json!({ "detail": "No movie ids left to assign; supply an explicit id" }),
            ),
            ApiError::Store(e) => {
                error!("Movie store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_kind() {
        assert_eq!(
            ApiError::movie_not_found().into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::invalid("year", "Must be between 1900 and 2100")
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(StoreError::Conflict(1)).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::IdsExhausted)
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Poisoned).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
