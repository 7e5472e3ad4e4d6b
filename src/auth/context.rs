// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Request-scoped authentication state
//!
//! [`RequestAuthState`] is built once per request by the authenticate guard and
//! lives in that request's local cache. It is never stored anywhere a
//! concurrently processed request could observe it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::jwt::ClaimSet;

/// Bearer token issued by the identity provider
///
/// Opaque to the gateway and only meaningful to the provider's API. The
/// `Debug` output is redacted so the credential never reaches the logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpstreamCredential(String);

impl UpstreamCredential {
    /// Wrap a raw provider token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for UpstreamCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpstreamCredential(***)")
    }
}

/// Where a request stands after the authenticate filter
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialContext {
    /// The token verified but carries no upstream credential
    NoCredential,
    /// The token verified and carries an upstream credential
    WithCredential(UpstreamCredential),
}

/// Decoded claims and upstream credential of the current request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestAuthState {
    claims: ClaimSet,
    credential: CredentialContext,
}

impl RequestAuthState {
    /// Build the state from verified claims
    ///
    /// The credential is the first identity record's `access_token`; any other
    /// shape yields [`CredentialContext::NoCredential`].
    pub fn from_claims(claims: ClaimSet) -> Self {
        let credential = match claims.first_access_token() {
            Some(token) => CredentialContext::WithCredential(UpstreamCredential::new(token)),
            None => CredentialContext::NoCredential,
        };
        Self { claims, credential }
    }

    /// The verified claims
    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    /// Subject of the token, the caller's `remoteID`
    pub fn subject(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }

    /// Credential state of the request
    pub fn context(&self) -> &CredentialContext {
        &self.credential
    }

    /// The upstream credential, if the token carries one
    pub fn upstream_credential(&self) -> Option<&UpstreamCredential> {
        match &self.credential {
            CredentialContext::WithCredential(credential) => Some(credential),
            CredentialContext::NoCredential => None,
        }
    }

    /// Provider of the first identity record
    pub fn provider(&self) -> Option<&str> {
        self.claims
            .identities
            .as_ref()?
            .first()?
            .provider
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::IdentityClaim;

    #[test]
    fn credential_is_taken_from_first_identity() {
        let claims = ClaimSet::for_subject("github|42")
            .with_identity(IdentityClaim::new("github", "42", "xyz"));
        let state = RequestAuthState::from_claims(claims);
        assert_eq!(state.subject(), Some("github|42"));
        assert_eq!(state.provider(), Some("github"));
        assert_eq!(
            state.upstream_credential().map(UpstreamCredential::as_str),
            Some("xyz")
        );
    }

    #[test]
    fn no_identities_is_no_credential() {
        let state = RequestAuthState::from_claims(ClaimSet::for_subject("github|42"));
        assert_eq!(state.context(), &CredentialContext::NoCredential);
        assert!(state.upstream_credential().is_none());
        assert!(state.provider().is_none());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = UpstreamCredential::new("gho_secret");
        assert_eq!(format!("{:?}", credential), "UpstreamCredential(***)");
    }
}
