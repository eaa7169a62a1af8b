//! Authentication routes

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, info, warn};

use crate::{
    credentials::CredentialStore,
    error::AuthError,
    jwt::JwtService,
    middleware::auth_middleware,
    models::{AuthUser, LoginCredentials, TokenResponse, UserResponse},
    validation::{validate_email, validate_password},
};

/// State shared by the authentication handlers
#[derive(Clone)]
pub struct AuthState {
    pub jwt_service: JwtService,
    pub credential_store: Arc<dyn CredentialStore>,
}

/// Create the router for `/login` and `/users/me`
pub fn create_router(state: AuthState) -> Router {
    let protected_routes = Router::new()
        .route("/users/me", get(read_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/login", post(login))
        .merge(protected_routes)
        .with_state(state)
}

/// User login endpoint
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload.map_err(|rejection| {
        AuthError::validation("body", rejection.body_text())
    })?;

    validate_email(&payload.email).map_err(|message| AuthError::validation("email", message))?;
    validate_password(&payload.password)
        .map_err(|message| AuthError::validation("password", message))?;

    let authenticated = state
        .credential_store
        .authenticate(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to check credentials: {}", e);
            AuthError::InternalServerError
        })?;

    if !authenticated {
        warn!(email = %payload.email, "Rejected login attempt");
        return Err(AuthError::bad_credentials());
    }

    let access_token = state
        .jwt_service
        .issue_token(&payload.email)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            AuthError::InternalServerError
        })?;

    info!(email = %payload.email, "User logged in");

    let response = TokenResponse::bearer(access_token, state.jwt_service.access_token_expiry());
    Ok((StatusCode::OK, Json(response)))
}

/// Return the subject of the presented token
pub async fn read_current_user(Extension(user): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse {
        email: user.subject,
    })
}
