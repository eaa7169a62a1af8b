//! Server configuration loaded from `API_*` environment variables

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which movie store the server runs against
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

/// HTTP server settings
///
/// # Environment Variables
/// - `API_HOST`: Bind address (default: `0.0.0.0`)
/// - `API_PORT`: Bind port (default: 8000)
/// - `API_STORE`: `memory` or `postgres` (default: `memory`)
/// - `API_SEED`: Start the in-memory store with demo movies (default: true)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    #[serde(default)]
    pub store: StoreBackend,
    #[serde(default = "ServerConfig::default_seed")]
    pub seed: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()
            .context("failed to build server configuration")?
            .try_deserialize()
            .context("failed to deserialize server configuration")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8000
    }

    fn default_seed() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = ["API_HOST", "API_PORT", "API_STORE", "API_SEED"];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_environment() {
        clear_env();

        let config = ServerConfig::load().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.store, StoreBackend::Memory);
        assert!(config.seed);
    }

    #[test]
    #[serial]
    fn environment_overrides_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("API_HOST", "127.0.0.1");
            std::env::set_var("API_PORT", "9090");
            std::env::set_var("API_STORE", "postgres");
            std::env::set_var("API_SEED", "false");
        }

        let config = ServerConfig::load().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.store, StoreBackend::Postgres);
        assert!(!config.seed);

        clear_env();
    }

    #[test]
    #[serial]
    fn unknown_store_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("API_STORE", "redis");
        }

        assert!(ServerConfig::load().is_err());

        clear_env();
    }
}
