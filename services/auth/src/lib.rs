//! Authentication for the movie catalog
//!
//! Provides the token service ([`jwt::JwtService`]), the credential lookup
//! capability ([`credentials::CredentialStore`]), the bearer-token middleware
//! that guards protected routes, and the `/login` and `/users/me` routes.

pub mod credentials;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod validation;

pub use credentials::{CredentialConfig, CredentialStore, StaticCredentialStore};
pub use error::AuthError;
pub use jwt::{Claims, JwtConfig, JwtService, TokenError};
pub use models::AuthUser;
pub use routes::{AuthState, create_router};
