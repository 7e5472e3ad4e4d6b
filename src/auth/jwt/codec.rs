// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! HS256 session token signing and verification
//!
//! Tokens are compact JWTs whose payload is the caller's [`ClaimSet`] flattened
//! next to the registered `iat` and `exp` claims. Any party holding the same
//! secret can verify them.
//!
//! A token is valid while `now < exp`. There is no leeway, so a token signed
//! with a zero validity is rejected as soon as it is presented.
//!
//! # Example
//!
//! ```
//! use chrono::Duration;
//! use rust_auth_gateway::auth::jwt::{ClaimSet, IdentityClaim, TokenCodec};
//!
//! let codec = TokenCodec::new(b"shared-secret", Duration::hours(1));
//! let claims = ClaimSet::for_subject("github|42")
//!     .with_identity(IdentityClaim::new("github", "42", "xyz"));
//!
//! let token = codec.sign(&claims).unwrap();
//! let decoded = codec.verify(&token).unwrap();
//! assert_eq!(decoded.first_access_token(), Some("xyz"));
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::claims::ClaimSet;
use crate::auth::error::AuthError;

/// Claim names owned by the codec
const REGISTERED_TIME_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Payload actually written into the token
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Issued at, Unix seconds
    iat: i64,
    /// Expiration, Unix seconds
    exp: i64,
    #[serde(flatten)]
    claims: ClaimSet,
}

/// Signs and verifies session tokens with a shared HMAC secret
///
/// The codec is immutable after construction and cheap to clone, so a single
/// instance is shared by every request.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from the decoded secret and the validity of issued tokens
    pub fn new(secret: &[u8], validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validity,
        }
    }

    /// Validity applied by [`TokenCodec::sign`]
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign `claims` with the codec's default validity
    pub fn sign(&self, claims: &ClaimSet) -> Result<String, AuthError> {
        self.sign_for(claims, self.validity)
    }

    /// Sign `claims` with an explicit validity
    pub fn sign_for(&self, claims: &ClaimSet, validity: Duration) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let mut claims = claims.clone();
        for name in REGISTERED_TIME_CLAIMS {
            claims.extra.remove(name);
        }
        let payload = SessionClaims {
            iat,
            exp: iat + validity.num_seconds(),
            claims,
        };
        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify `token` and return its embedded claims
    pub fn verify(&self, token: &str) -> Result<ClaimSet, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed(e.to_string()),
            },
        )?;

        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }
        Ok(data.claims.claims)
    }
}

/// Sign `claims` with `secret`, valid for `validity` from now
pub fn sign(claims: &ClaimSet, secret: &[u8], validity: Duration) -> Result<String, AuthError> {
    TokenCodec::new(secret, validity).sign(claims)
}

/// Verify `token` against `secret`
pub fn verify(token: &str, secret: &[u8]) -> Result<ClaimSet, AuthError> {
    TokenCodec::new(secret, Duration::zero()).verify(token)
}
