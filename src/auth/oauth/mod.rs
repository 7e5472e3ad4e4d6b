// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authorization-code exchange with external identity providers
//!
//! Each identity provider is an [`OAuthProvider`]. The login route selects one
//! from the [`ProviderRegistry`] by its `<provider>` path segment, exchanges
//! the authorization code for an [`UpstreamCredential`], and fetches the
//! caller's profile with it.

mod github;

pub use github::GithubProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::context::UpstreamCredential;
use super::error::AuthError;

/// Profile returned by an identity provider for the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Provider-native user identifier
    pub user_id: String,
    /// Login name
    pub login: String,
}

impl ProviderProfile {
    /// Globally unique identifier `"<provider>|<provider-native-id>"`
    pub fn remote_id(&self, provider: &str) -> String {
        format!("{}|{}", provider, self.user_id)
    }
}

/// Identity established by a successful login exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// `"<provider>|<provider-native-id>"`
    pub remote_id: String,
    /// Login name at the provider
    pub display_name: String,
    /// Credential to act on the caller's behalf at the provider
    pub upstream_credential: UpstreamCredential,
}

impl CallerIdentity {
    /// Combine a provider profile with the credential that fetched it
    pub fn from_profile(
        provider: &str,
        profile: &ProviderProfile,
        credential: UpstreamCredential,
    ) -> Self {
        Self {
            remote_id: profile.remote_id(provider),
            display_name: profile.login.clone(),
            upstream_credential: credential,
        }
    }
}

/// Capability interface of an OAuth identity provider
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Route segment and `remoteID` prefix of this provider
    fn name(&self) -> &str;

    /// Exchange an authorization code for the provider's access token
    ///
    /// Fails with [`AuthError::MissingCode`] before any network call when
    /// `code` is empty.
    async fn exchange_code(&self, code: &str, state: &str)
        -> Result<UpstreamCredential, AuthError>;

    /// Fetch the profile of the user owning `credential`
    async fn fetch_profile(
        &self,
        credential: &UpstreamCredential,
    ) -> Result<ProviderProfile, AuthError>;
}

/// Registered identity providers, keyed by name
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn OAuthProvider>>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name, replacing any previous one
    pub fn register(&mut self, provider: Arc<dyn OAuthProvider>) -> &mut Self {
        self.providers.insert(provider.name().to_string(), provider);
        self
    }

    /// Builder-style [`ProviderRegistry::register`]
    pub fn with(mut self, provider: Arc<dyn OAuthProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Look up a provider by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn OAuthProvider>, AuthError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| AuthError::UnknownProvider(name.to_string()))
    }

    /// Names of all registered providers
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
