// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! First filter of the chain: session token authentication
//!
//! The token is taken from `Authorization: Bearer <token>` (scheme matched
//! case-insensitively) or, failing that, from the `id_token` query parameter.
//! It is verified with the managed [`TokenCodec`] and the resulting
//! [`RequestAuthState`] is memoized in the request's local cache, so every
//! later guard of the same request reads the same state and no other request
//! can see it.

use log::debug;
use rocket::request::{FromRequest, Outcome, Request};

use super::reject;
use crate::auth::context::RequestAuthState;
use crate::auth::error::AuthError;
use crate::auth::jwt::TokenCodec;

/// Query parameter accepted as an alternative to the `Authorization` header
pub const ID_TOKEN_PARAM: &str = "id_token";

/// Outcome of the authenticate filter, cached once per request
struct AuthOutcome(Result<RequestAuthState, AuthError>);

/// Request guard for routes that need proof of identity
///
/// Succeeds when the request carries a valid session token. Rejects with
/// `401 Unauthorized` otherwise, without revealing which check failed.
///
/// ```rust,no_run
/// use rocket::get;
/// use rust_auth_gateway::auth::Authenticated;
///
/// #[get("/whoami")]
/// fn whoami(user: Authenticated<'_>) -> String {
///     user.subject().unwrap_or("anonymous").to_string()
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Authenticated<'r> {
    state: &'r RequestAuthState,
}

impl<'r> Authenticated<'r> {
    /// Request-scoped authentication state
    pub fn state(&self) -> &'r RequestAuthState {
        self.state
    }

    /// Subject of the session token
    pub fn subject(&self) -> Option<&'r str> {
        self.state.subject()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Authenticated<'r> {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let outcome = request.local_cache(|| AuthOutcome(authenticate(request)));

        match &outcome.0 {
            Ok(state) => Outcome::Success(Authenticated { state }),
            Err(error) => reject(request, error.clone()),
        }
    }
}

/// Run the authenticate filter against `request`
fn authenticate(request: &Request<'_>) -> Result<RequestAuthState, AuthError> {
    let authorization = request.headers().get_one("Authorization");
    let id_token = request
        .query_value::<&str>(ID_TOKEN_PARAM)
        .and_then(Result::ok);
    let token = extract_token(authorization, id_token).ok_or(AuthError::MissingToken)?;

    let codec = request
        .rocket()
        .state::<TokenCodec>()
        .ok_or(AuthError::Misconfigured("token codec is not managed"))?;

    let claims = codec.verify(&token).inspect_err(|e| {
        debug!("Session token rejected: {}", e);
    })?;
    Ok(RequestAuthState::from_claims(claims))
}

/// Pick the session token out of the request
///
/// A `Bearer` header wins over the query parameter. Values are trimmed and an
/// empty value counts as absent.
pub fn extract_token(authorization: Option<&str>, id_token: Option<&str>) -> Option<String> {
    let from_header = authorization.and_then(|header| {
        let scheme = header.get(..7)?;
        if scheme.eq_ignore_ascii_case("bearer ") {
            Some(header[7..].trim())
        } else {
            None
        }
    });

    from_header
        .filter(|token| !token.is_empty())
        .or_else(|| id_token.map(str::trim).filter(|token| !token.is_empty()))
        .map(str::to_string)
}
