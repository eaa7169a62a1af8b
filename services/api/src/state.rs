//! Application state shared across handlers

use std::sync::Arc;

use auth::{AuthState, CredentialStore, JwtService};

use crate::repositories::MovieStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub movie_store: Arc<dyn MovieStore>,
    pub jwt_service: JwtService,
    pub credential_store: Arc<dyn CredentialStore>,
}

impl AppState {
    /// The slice of state the login routes need
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            jwt_service: self.jwt_service.clone(),
            credential_store: self.credential_store.clone(),
        }
    }
}
