// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Second filter of the chain: upstream credential requirement
//!
//! Some routes act on the caller's behalf against the identity provider and
//! therefore need the provider credential embedded in the session token.
//! [`UpstreamCall`] runs the authenticate filter first, then rejects with
//! `400 Bad Request` when the token carries no credential.

use reqwest::header::AUTHORIZATION;
use rocket::http::Header;
use rocket::request::{FromRequest, Outcome, Request};

use super::{reject, Authenticated};
use crate::auth::context::{RequestAuthState, UpstreamCredential};
use crate::auth::error::AuthError;

/// Request guard for routes that call the identity provider for the caller
///
/// The credential is exposed the way the provider expects it on its own API:
/// the raw token as the `Authorization` value, without a `Bearer ` prefix.
///
/// ```rust,no_run
/// use rocket::get;
/// use rust_auth_gateway::auth::UpstreamCall;
///
/// #[get("/repos")]
/// async fn repos(call: UpstreamCall<'_>) -> Option<String> {
///     let request = call.apply(reqwest::Client::new().get("https://api.github.com/user/repos"));
///     request.send().await.ok()?.text().await.ok()
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UpstreamCall<'r> {
    state: &'r RequestAuthState,
    credential: &'r UpstreamCredential,
}

impl<'r> UpstreamCall<'r> {
    /// Request-scoped authentication state
    pub fn state(&self) -> &'r RequestAuthState {
        self.state
    }

    /// The caller's upstream credential
    pub fn credential(&self) -> &'r UpstreamCredential {
        self.credential
    }

    /// Value to send as `Authorization` to the identity provider
    pub fn authorization_value(&self) -> &'r str {
        self.credential.as_str()
    }

    /// `Authorization` header carrying the raw upstream credential
    pub fn authorization_header(&self) -> Header<'static> {
        Header::new("Authorization", self.credential.as_str().to_string())
    }

    /// Attach the upstream credential to an outgoing call
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(AUTHORIZATION, self.authorization_value())
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UpstreamCall<'r> {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let authenticated = match Authenticated::from_request(request).await {
            Outcome::Success(authenticated) => authenticated,
            Outcome::Error(failure) => return Outcome::Error(failure),
            Outcome::Forward(forward) => return Outcome::Forward(forward),
        };

        let state = authenticated.state();
        match state.upstream_credential() {
            Some(credential) => Outcome::Success(UpstreamCall { state, credential }),
            None => reject(request, AuthError::MissingUpstreamCredential),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{ClaimSet, IdentityClaim};

    #[test]
    fn credential_is_injected_without_prefix() {
        let state = RequestAuthState::from_claims(
            ClaimSet::for_subject("github|42")
                .with_identity(IdentityClaim::new("github", "42", "gho_abc")),
        );
        let credential = state.upstream_credential().expect("credential");
        let call = UpstreamCall {
            state: &state,
            credential,
        };

        assert_eq!(call.authorization_value(), "gho_abc");
        let header = call.authorization_header();
        assert_eq!(header.name().as_str(), "Authorization");
        assert_eq!(header.value(), "gho_abc");

        let outgoing = call
            .apply(reqwest::Client::new().get("http://localhost/user"))
            .build()
            .expect("request");
        assert_eq!(
            outgoing.headers().get(AUTHORIZATION).map(|v| v.as_bytes()),
            Some(&b"gho_abc"[..])
        );
    }
}
