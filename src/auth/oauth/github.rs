// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! GitHub OAuth application support
//!
//! Implements the authorization-code grant against GitHub's token endpoint and
//! the `/user` profile lookup. Both endpoints are configurable so a GitHub
//! Enterprise instance or a mock server can stand in for github.com.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

use super::{OAuthProvider, ProviderProfile};
use crate::auth::context::UpstreamCredential;
use crate::auth::error::AuthError;
use crate::config::{ConfigError, GithubConfig};

/// Body of GitHub's token endpoint
///
/// GitHub answers refused exchanges with `200 OK` and an `error` field, so
/// both shapes share one structure.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Subset of GitHub's `/user` response
#[derive(Debug, Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
}

/// GitHub identity provider
pub struct GithubProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    token_url: Url,
    user_url: Url,
    user_agent: String,
}

impl fmt::Debug for GithubProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubProvider")
            .field("client_id", &self.client_id)
            .field("token_url", &self.token_url.as_str())
            .field("user_url", &self.user_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GithubProvider {
    /// Provider name, also the `remoteID` prefix
    pub const NAME: &'static str = "github";

    /// Build the provider and its HTTP client from configuration
    ///
    /// Every call made by the client is bounded by `config.timeout` seconds.
    pub fn new(config: &GithubConfig) -> Result<Self, ConfigError> {
        let token_url = Url::parse(&config.token_url)
            .map_err(|e| ConfigError::InvalidUrl(config.token_url.clone(), e))?;
        let user_url = Url::parse(&with_trailing_slash(&config.api_url))
            .and_then(|api_url| api_url.join("user"))
            .map_err(|e| ConfigError::InvalidUrl(config.api_url.clone(), e))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url,
            user_url,
            user_agent: config.user_agent.clone(),
        })
    }

    fn access_token_url(&self, code: &str, state: &str) -> Url {
        let mut url = self.token_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("code", code)
            .append_pair("state", state);
        url
    }
}

#[async_trait]
impl OAuthProvider for GithubProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn exchange_code(
        &self,
        code: &str,
        state: &str,
    ) -> Result<UpstreamCredential, AuthError> {
        if code.is_empty() {
            return Err(AuthError::MissingCode);
        }

        debug!("Exchanging authorization code at {}", self.token_url);
        let response = self
            .client
            .post(self.access_token_url(code, state))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(unreachable)?;

        let body: TokenResponse = read_json(response, "token endpoint").await?;
        if let Some(error) = body.error {
            return Err(AuthError::UpstreamRejected(
                body.error_description.unwrap_or(error),
            ));
        }
        body.access_token
            .filter(|token| !token.is_empty())
            .map(UpstreamCredential::new)
            .ok_or_else(|| {
                AuthError::UpstreamMalformedResponse(
                    "token response carries no access_token".to_string(),
                )
            })
    }

    async fn fetch_profile(
        &self,
        credential: &UpstreamCredential,
    ) -> Result<ProviderProfile, AuthError> {
        debug!("Fetching user profile from {}", self.user_url);
        let response = self
            .client
            .get(self.user_url.clone())
            .bearer_auth(credential.as_str())
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(unreachable)?;

        let user: GithubUser = read_json(response, "user endpoint").await?;
        Ok(ProviderProfile {
            user_id: user.id.to_string(),
            login: user.login,
        })
    }
}

/// Map a transport failure, dropping the request URL
///
/// The token endpoint URL carries the client secret and the authorization
/// code in its query, so it must not reach the logs.
fn unreachable(error: reqwest::Error) -> AuthError {
    let error = error.without_url();
    if error.is_timeout() {
        AuthError::UpstreamUnreachable(format!("request timed out: {}", error))
    } else {
        AuthError::UpstreamUnreachable(error.to_string())
    }
}

/// Read a JSON body, rejecting non-success statuses first
async fn read_json<T: DeserializeOwned>(
    response: Response,
    endpoint: &str,
) -> Result<T, AuthError> {
    let status = response.status();
    let body = response.bytes().await.map_err(unreachable)?;
    if !status.is_success() {
        return Err(AuthError::UpstreamRejected(format!(
            "{} answered {}",
            endpoint, status
        )));
    }
    serde_json::from_slice(&body)
        .map_err(|e| AuthError::UpstreamMalformedResponse(format!("{}: {}", endpoint, e)))
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
