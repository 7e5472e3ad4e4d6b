// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Request guards forming the authentication filter chain
//!
//! Rocket evaluates guards in the order handler parameters are declared, so a
//! route taking [`UpstreamCall`] runs `authenticate` then
//! `requireUpstreamCredential`, strictly in sequence:
//!
//! | Guard | Rejects with | When |
//! |-------|--------------|------|
//! | [`Authenticated`] | 401 | no token, or the token does not verify |
//! | [`UpstreamCall`] | 401 / 400 | as above / the token carries no upstream credential |
//!
//! The reason of a rejection is stashed in the request's local cache so the
//! error catcher can render the JSON envelope.

mod authenticate;
mod upstream;

pub use authenticate::{extract_token, Authenticated, ID_TOKEN_PARAM};
pub use upstream::UpstreamCall;

use rocket::request::{Outcome, Request};

use super::error::AuthError;

/// Reason a guard rejected the current request
#[derive(Default)]
struct Rejection(Option<AuthError>);

/// Fail a guard with `error`, remembering it for the catcher
pub(crate) fn reject<S>(request: &Request<'_>, error: AuthError) -> Outcome<S, AuthError> {
    let status = error.status();
    let stashed = error.clone();
    request.local_cache(move || Rejection(Some(stashed)));
    Outcome::Error((status, error))
}

/// Error a guard rejected the current request with, if any
pub fn rejection<'r>(request: &'r Request<'_>) -> Option<&'r AuthError> {
    request.local_cache(Rejection::default).0.as_ref()
}
