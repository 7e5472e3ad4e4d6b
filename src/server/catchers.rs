// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, Request};

use crate::auth::guards;
use crate::auth::ErrorEnvelope;

/// Render every error status as the JSON envelope
///
/// Guard rejections carry their [`crate::auth::AuthError`] through the request
/// local cache; anything else (unknown route, malformed query) gets a generic
/// envelope built from the status.
#[catch(default)]
pub fn default_catcher(status: Status, request: &Request<'_>) -> (Status, Json<ErrorEnvelope>) {
    let envelope = match guards::rejection(request) {
        Some(error) if error.status() == status => error.envelope(),
        _ => ErrorEnvelope::from_status(status),
    };
    (status, Json(envelope))
}
