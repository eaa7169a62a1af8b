//! Error type for the authentication routes and middleware

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, invalid or expired token, or bad login credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Malformed login request
    #[error("Validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl AuthError {
    /// Missing, invalid or expired bearer token
    pub fn invalid_token() -> Self {
        AuthError::Unauthorized("Could not validate credentials")
    }

    /// Email/password pair did not match
    pub fn bad_credentials() -> Self {
        AuthError::Unauthorized("Incorrect email or password")
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized(detail) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            AuthError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "detail": "Validation failed",
                    "errors": [{ "field": field, "message": message }],
                })),
            )
                .into_response(),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Internal server error" })),
            )
                .into_response(),
        }
    }
}
