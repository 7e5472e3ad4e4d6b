// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management
//!
//! The gateway reads an optional YAML file, then lets the environment override
//! the secrets:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AUTH_SECRET` | `access.secret` |
//! | `GITHUB_CLIENT_ID` | `github.client_id` |
//! | `GITHUB_CLIENT_SECRET` | `github.client_secret` |
//!
//! # Example file
//!
//! ```yaml
//! server:
//!   address: 0.0.0.0
//!   port: 8080
//! access:
//!   token_validity: 3600
//! github:
//!   client_id: Iv1.0123456789abcdef
//!   timeout: 5
//! store:
//!   timeout: 2
//! ```

pub mod access;
pub mod github;

pub use access::AccessConfig;
pub use github::GithubConfig;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the base64url signing secret
pub const AUTH_SECRET_ENV: &str = "AUTH_SECRET";
/// Environment variable holding the GitHub OAuth client id
pub const GITHUB_CLIENT_ID_ENV: &str = "GITHUB_CLIENT_ID";
/// Environment variable holding the GitHub OAuth client secret
pub const GITHUB_CLIENT_SECRET_ENV: &str = "GITHUB_CLIENT_SECRET";

/// Fatal configuration problems detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No signing secret was configured
    #[error("AUTH_SECRET is not set")]
    MissingSecret,

    /// The signing secret is not valid base64url
    #[error("AUTH_SECRET is not valid base64url: {0}")]
    InvalidSecret(#[source] base64::DecodeError),

    /// The token validity is not a positive, representable number of seconds
    #[error("token validity must be a positive number of seconds, got {0}")]
    InvalidTokenValidity(i64),

    /// An endpoint URL cannot be parsed
    #[error("invalid URL '{0}': {1}")]
    InvalidUrl(String, #[source] url::ParseError),

    /// The HTTP client for identity provider calls cannot be built
    #[error("unable to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_name() -> String {
    format!("AuthGateway/{}", env!("CARGO_PKG_VERSION"))
}

fn default_store_timeout() -> u64 {
    5
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_address")]
    pub address: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Server identity sent in the `Server` header
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            name: default_name(),
        }
    }
}

/// User store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Timeout of a single store call in seconds
    #[serde(default = "default_store_timeout")]
    pub timeout: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeout: default_store_timeout(),
        }
    }
}

/// Root configuration of the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Session tokens
    #[serde(default)]
    pub access: AccessConfig,

    /// GitHub OAuth application
    #[serde(default)]
    pub github: GithubConfig,

    /// User store
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;
        let config: Config = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;
        Ok(config)
    }

    /// Override secrets from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Override secrets from `lookup`, ignoring empty values
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
        if let Some(secret) = var(AUTH_SECRET_ENV) {
            self.access.secret = secret;
        }
        if let Some(client_id) = var(GITHUB_CLIENT_ID_ENV) {
            self.github.client_id = client_id;
        }
        if let Some(client_secret) = var(GITHUB_CLIENT_SECRET_ENV) {
            self.github.client_secret = client_secret;
        }
    }

    /// Apply command line overrides
    pub fn apply_args(
        &mut self,
        address: Option<String>,
        port: Option<u16>,
        token_validity: Option<i64>,
    ) {
        if let Some(address) = address {
            self.server.address = address;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(token_validity) = token_validity {
            self.access.token_validity = token_validity;
        }
    }

    /// Check the settings that must hold before the server starts
    ///
    /// The signing secret must decode. Missing GitHub client credentials only
    /// produce a warning: the filter chain still works without them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.access.decode_secret()?;
        self.access.validity()?;
        if self.github.client_id.is_empty() || self.github.client_secret.is_empty() {
            warn!(
                "{} or {} is not set, GitHub logins will be rejected",
                GITHUB_CLIENT_ID_ENV, GITHUB_CLIENT_SECRET_ENV
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.access.token_validity, 86400);
        assert_eq!(config.github.timeout, 10);
        assert_eq!(config.store.timeout, 5);
        assert!(config.access.secret.is_empty());
    }

    #[test]
    fn environment_overrides_secrets() {
        let vars = env(&[
            ("AUTH_SECRET", "c2VjcmV0MQ=="),
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "shh"),
        ]);
        let mut config = Config::default();
        config.apply_env_from(|name| vars.get(name).cloned());
        assert_eq!(config.access.secret, "c2VjcmV0MQ==");
        assert_eq!(config.github.client_id, "id");
        assert_eq!(config.github.client_secret, "shh");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let vars = env(&[("AUTH_SECRET", "")]);
        let mut config = Config::default();
        config.access.secret = "c2VjcmV0MQ==".to_string();
        config.apply_env_from(|name| vars.get(name).cloned());
        assert_eq!(config.access.secret, "c2VjcmV0MQ==");
    }

    #[test]
    fn missing_secret_fails_validation() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingSecret)));
    }

    #[test]
    fn unusable_token_validity_fails_validation() {
        let mut config = Config::default();
        config.access.secret = "c2VjcmV0MQ==".to_string();
        for seconds in [0, -1, i64::MAX] {
            config.apply_args(None, None, Some(seconds));
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTokenValidity(value)) if value == seconds
            ));
        }
    }

    #[test]
    fn args_override_file_values() {
        let mut config = Config::default();
        config.apply_args(Some("0.0.0.0".to_string()), Some(9000), Some(60));
        assert_eq!(config.server.address, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.access.token_validity, 60);

        config.apply_args(None, None, None);
        assert_eq!(config.server.port, 9000);
    }
}
