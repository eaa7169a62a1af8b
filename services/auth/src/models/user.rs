//! User models for login and identity

use serde::{Deserialize, Serialize};

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// Response for the current user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
}

/// Authenticated user information, placed in request extensions by the
/// auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Token subject (the user's email)
    pub subject: String,
}
