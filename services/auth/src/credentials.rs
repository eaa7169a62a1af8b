//! Credential lookup
//!
//! Login goes through the [`CredentialStore`] trait so the fixed table used
//! today can be swapped for a database-backed user store.

use std::collections::HashMap;

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use async_trait::async_trait;
use tracing::info;

use crate::models::LoginCredentials;

/// Looks up a user by email and checks a password
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// True iff a user with `email` exists and `password` verifies against it
    async fn authenticate(&self, email: &str, password: &str) -> Result<bool>;
}

/// Credential configuration
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    /// The single configured account
    pub user: LoginCredentials,
}

impl CredentialConfig {
    /// Create a new CredentialConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AUTH_USER_EMAIL`: Account email (default: `admin@gmail.com`)
    /// - `AUTH_USER_PASSWORD`: Account password (default: `admin`)
    pub fn from_env() -> Self {
        let email =
            std::env::var("AUTH_USER_EMAIL").unwrap_or_else(|_| "admin@gmail.com".to_string());
        let password = std::env::var("AUTH_USER_PASSWORD").unwrap_or_else(|_| "admin".to_string());

        CredentialConfig {
            user: LoginCredentials { email, password },
        }
    }
}

/// A fixed credential table held in memory
///
/// Passwords are hashed with Argon2 when the table is built and never kept
/// in plaintext.
pub struct StaticCredentialStore {
    password_hashes: HashMap<String, String>,
}

impl StaticCredentialStore {
    /// Build a store from plaintext credentials
    pub fn new(users: &[LoginCredentials]) -> Result<Self> {
        let argon2 = Argon2::default();
        let mut password_hashes = HashMap::with_capacity(users.len());

        for user in users {
            let salt = SaltString::generate(&mut rand::thread_rng());
            let password_hash = argon2
                .hash_password(user.password.as_bytes(), &salt)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
                .to_string();
            password_hashes.insert(user.email.clone(), password_hash);
        }

        info!(users = password_hashes.len(), "Credential store initialized");
        Ok(Self { password_hashes })
    }

    /// Build a store holding the configured account
    pub fn from_config(config: &CredentialConfig) -> Result<Self> {
        Self::new(std::slice::from_ref(&config.user))
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn authenticate(&self, email: &str, password: &str) -> Result<bool> {
        let Some(stored) = self.password_hashes.get(email) else {
            return Ok(false);
        };

        let parsed_hash = PasswordHash::new(stored)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn admin() -> LoginCredentials {
        LoginCredentials {
            email: "admin@gmail.com".to_string(),
            password: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn authenticates_matching_credentials() {
        let store = StaticCredentialStore::new(&[admin()]).unwrap();
        assert!(store.authenticate("admin@gmail.com", "admin").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_unknown_email() {
        let store = StaticCredentialStore::new(&[admin()]).unwrap();
        assert!(!store.authenticate("admin@gmail.com", "Admin").await.unwrap());
        assert!(!store.authenticate("root@gmail.com", "admin").await.unwrap());
        assert!(!store.authenticate("", "").await.unwrap());
    }

    #[test]
    fn does_not_keep_plaintext_passwords() {
        let store = StaticCredentialStore::new(&[admin()]).unwrap();
        let stored = &store.password_hashes["admin@gmail.com"];
        assert_ne!(stored, "admin");
        assert!(stored.starts_with("$argon2"));
    }

    #[test]
    #[serial]
    fn test_credential_config_from_env() {
        unsafe {
            std::env::remove_var("AUTH_USER_EMAIL");
            std::env::remove_var("AUTH_USER_PASSWORD");
        }
        let config = CredentialConfig::from_env();
        assert_eq!(config.user.email, "admin@gmail.com");
        assert_eq!(config.user.password, "admin");

        unsafe {
            std::env::set_var("AUTH_USER_EMAIL", "curator@example.com");
            std::env::set_var("AUTH_USER_PASSWORD", "s3cret");
        }
        let config = CredentialConfig::from_env();
        assert_eq!(config.user.email, "curator@example.com");
        assert_eq!(config.user.password, "s3cret");

        unsafe {
            std::env::remove_var("AUTH_USER_EMAIL");
            std::env::remove_var("AUTH_USER_PASSWORD");
        }
    }
}
