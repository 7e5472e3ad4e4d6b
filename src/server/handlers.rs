// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Protected API routes, mounted under `/api`

use log::debug;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::{Deserialize, Serialize};

use crate::auth::oauth::GithubProvider;
use crate::auth::{AuthError, Authenticated, ProviderProfile, ProviderRegistry, UpstreamCall};

/// What the session token says about its bearer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    /// Token subject, the caller's `remoteID`
    pub user_id: Option<String>,
    /// Providers listed in the `identities` claim
    pub providers: Vec<String>,
    /// Whether routes acting on the caller's behalf are usable
    pub has_upstream_credential: bool,
}

/// Describe the authenticated caller
#[get("/me")]
pub fn me(user: Authenticated<'_>) -> Json<MeResponse> {
    let state = user.state();
    Json(MeResponse {
        user_id: state.subject().map(str::to_string),
        providers: state.claims().providers(),
        has_upstream_credential: state.upstream_credential().is_some(),
    })
}

/// Fetch the caller's profile from the identity provider with their credential
#[get("/upstream/user")]
pub async fn upstream_user(
    call: UpstreamCall<'_>,
    providers: &State<ProviderRegistry>,
) -> Result<Json<ProviderProfile>, AuthError> {
    let name = call.state().provider().unwrap_or(GithubProvider::NAME);
    let provider = providers.get(name)?;
    debug!("Fetching upstream profile from {}", name);
    let profile = provider.fetch_profile(call.credential()).await?;
    Ok(Json(profile))
}
