// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authentication error taxonomy
//!
//! Every failure in the gateway is terminal for the request that produced it.
//! [`AuthError`] carries the internal detail (logged, never echoed) and knows
//! how to render itself as the uniform JSON error envelope:
//!
//! ```json
//! { "status": 401, "code": "missing_code", "message": "No authorization code provided" }
//! ```
//!
//! | Layer | Variants | Status |
//! |-------|----------|--------|
//! | Token | `MissingToken`, `InvalidSignature`, `Expired`, `Malformed` | 401 |
//! | IdP exchange | `MissingCode`, `UpstreamUnreachable`, `UpstreamMalformedResponse`, `UpstreamRejected` | 401 |
//! | Provider selection | `UnknownProvider` | 404 |
//! | Filter | `MissingUpstreamCredential` | 400 |
//! | Persistence | `StoreFailure` | 401 |
//! | Issuance | `Signing` | 401 |
//! | Server | `Misconfigured` | 500 |

use log::warn;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while authenticating a caller or logging one in
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Neither an `Authorization: Bearer` header nor an `id_token` query parameter
    #[error("missing access token")]
    MissingToken,

    /// The token signature does not match the signing secret
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token is past its validity window
    #[error("token expired")]
    Expired,

    /// The token could not be parsed
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The login request carried no authorization code
    #[error("no authorization code provided")]
    MissingCode,

    /// The `<provider>` route segment names no registered identity provider
    #[error("unknown identity provider '{0}'")]
    UnknownProvider(String),

    /// Transport error or timeout while talking to the identity provider
    #[error("identity provider unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The identity provider answered with a body we cannot use
    #[error("identity provider returned a malformed response: {0}")]
    UpstreamMalformedResponse(String),

    /// The identity provider refused the request
    #[error("identity provider rejected the request: {0}")]
    UpstreamRejected(String),

    /// The route needs the caller's upstream credential and the token has none
    #[error("missing upstream access token")]
    MissingUpstreamCredential,

    /// The user store failed or timed out
    #[error("user store failure: {0}")]
    StoreFailure(String),

    /// The session token could not be signed
    #[error("token signing failed: {0}")]
    Signing(String),

    /// Managed state the guards depend on is absent
    #[error("server misconfigured: {0}")]
    Misconfigured(&'static str),
}

impl AuthError {
    /// HTTP status this error maps to
    pub fn status(&self) -> Status {
        match self {
            AuthError::MissingUpstreamCredential => Status::BadRequest,
            AuthError::UnknownProvider(_) => Status::NotFound,
            AuthError::Misconfigured(_) => Status::InternalServerError,
            _ => Status::Unauthorized,
        }
    }

    /// Stable machine-readable code
    ///
    /// Token verification failures share a single code so that callers cannot
    /// tell which verification step rejected them.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed(_) => {
                "unauthorized"
            }
            AuthError::MissingCode => "missing_code",
            AuthError::UnknownProvider(_) => "unknown_provider",
            AuthError::UpstreamUnreachable(_) => "upstream_unreachable",
            AuthError::UpstreamMalformedResponse(_) => "upstream_malformed_response",
            AuthError::UpstreamRejected(_) => "upstream_rejected",
            AuthError::MissingUpstreamCredential => "missing_upstream_credential",
            AuthError::StoreFailure(_) => "store_failure",
            AuthError::Signing(_) => "token_signing_failed",
            AuthError::Misconfigured(_) => "server_error",
        }
    }

    /// Short human-readable description safe to send to the caller
    pub fn public_message(&self) -> String {
        match self {
            AuthError::MissingToken => "Missing Access Token".to_string(),
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed(_) => {
                "Unauthorized".to_string()
            }
            AuthError::MissingCode => "No authorization code provided".to_string(),
            AuthError::UnknownProvider(name) => format!("Unknown identity provider '{}'", name),
            AuthError::UpstreamUnreachable(_) => {
                "Error requesting the identity provider".to_string()
            }
            AuthError::UpstreamMalformedResponse(_) => {
                "Unable to read the identity provider response".to_string()
            }
            AuthError::UpstreamRejected(_) => {
                "The identity provider rejected the authorization".to_string()
            }
            AuthError::MissingUpstreamCredential => "Unable to find access token".to_string(),
            AuthError::StoreFailure(_) => "Unable to register user".to_string(),
            AuthError::Signing(_) => "Unable to create token for user".to_string(),
            AuthError::Misconfigured(_) => "Internal server error".to_string(),
        }
    }

    /// Build the JSON envelope for this error
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            status: self.status().code,
            code: self.code().to_string(),
            message: self.public_message(),
        }
    }
}

/// Uniform JSON body for every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Stable machine-readable code
    pub code: String,
    /// Human-readable description
    pub message: String,
}

impl ErrorEnvelope {
    /// Envelope for a status that was not produced by an [`AuthError`]
    pub fn from_status(status: Status) -> Self {
        let reason = status.reason().unwrap_or("Unknown Error");
        ErrorEnvelope {
            status: status.code,
            code: reason.to_ascii_lowercase().replace(' ', "_"),
            message: reason.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for AuthError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        warn!(
            "{} {} rejected with {}: {}",
            request.method(),
            request.uri().path(),
            self.status(),
            self
        );
        (self.status(), Json(self.envelope())).respond_to(request)
    }
}
