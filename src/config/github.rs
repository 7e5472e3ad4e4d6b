// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! GitHub OAuth application configuration

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_token_url() -> String {
    "https://github.com/login/oauth/access_token".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    format!("rust-auth-gateway/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    10
}

/// Credentials and endpoints of the GitHub OAuth application
#[derive(Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// OAuth application client id (`GITHUB_CLIENT_ID`)
    #[serde(default)]
    pub client_id: String,

    /// OAuth application client secret (`GITHUB_CLIENT_SECRET`)
    #[serde(default)]
    pub client_secret: String,

    /// Authorization-code exchange endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// `User-Agent` sent with every call (GitHub rejects calls without one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_url: default_token_url(),
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
        }
    }
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
