// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session token configuration
//!
//! Holds the shared signing secret and the validity of issued session tokens.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ConfigError;

/// URL-safe base64 accepting both padded and unpadded input
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn default_token_validity() -> i64 {
    86400
}

/// Signing secret and token lifetime
///
/// # Example
///
/// ```
/// use rust_auth_gateway::config::AccessConfig;
///
/// let access = AccessConfig {
///     secret: "c2hhcmVkLXNlY3JldA==".to_string(),
///     token_validity: 3600,
/// };
/// assert_eq!(access.decode_secret().unwrap(), b"shared-secret");
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Base64url-encoded HMAC secret, usually supplied through `AUTH_SECRET`
    #[serde(default)]
    pub secret: String,

    /// Validity of issued session tokens in seconds
    #[serde(default = "default_token_validity")]
    pub token_validity: i64,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_validity: default_token_validity(),
        }
    }
}

impl fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessConfig")
            .field("secret", &if self.secret.is_empty() { "" } else { "***" })
            .field("token_validity", &self.token_validity)
            .finish()
    }
}

impl AccessConfig {
    /// Decode the signing secret
    ///
    /// An empty or undecodable secret is a fatal configuration error.
    pub fn decode_secret(&self) -> Result<Vec<u8>, ConfigError> {
        let encoded = self.secret.trim();
        if encoded.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        let secret = URL_SAFE_LENIENT
            .decode(encoded)
            .map_err(ConfigError::InvalidSecret)?;
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(secret)
    }

    /// Token validity as a duration
    ///
    /// The validity must be a positive number of seconds that chrono can
    /// represent.
    pub fn validity(&self) -> Result<chrono::Duration, ConfigError> {
        if self.token_validity <= 0 {
            return Err(ConfigError::InvalidTokenValidity(self.token_validity));
        }
        chrono::Duration::try_seconds(self.token_validity)
            .ok_or(ConfigError::InvalidTokenValidity(self.token_validity))
    }
}
