// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Claim structures carried by session tokens
//!
//! The session token embeds the caller's identity provider records under the
//! `identities` claim. The first record's `access_token` is the upstream
//! credential that protected routes may forward to the identity provider.

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One identity provider record inside the `identities` claim
///
/// Every field is optional so that tokens minted by other issuers sharing the
/// secret still decode. A record without an `access_token` simply carries no
/// upstream credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    /// Identity provider name (e.g. `github`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Provider-native user identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Upstream OAuth access token issued by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl IdentityClaim {
    /// Create a complete identity record
    pub fn new(
        provider: impl Into<String>,
        user_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            provider: Some(provider.into()),
            user_id: Some(user_id.into()),
            access_token: Some(access_token.into()),
        }
    }
}

/// Claims embedded in a session token
///
/// The registered time claims (`iat`, `exp`) are owned by the codec and never
/// appear here. Claims the gateway does not know about are preserved in
/// [`ClaimSet::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject, the caller's `remoteID`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Identity provider records, most relevant first
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_identities"
    )]
    pub identities: Option<Vec<IdentityClaim>>,

    /// Any other claim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClaimSet {
    /// Claims for a caller identified by `sub`
    pub fn for_subject(sub: impl Into<String>) -> Self {
        Self {
            sub: Some(sub.into()),
            ..Default::default()
        }
    }

    /// Append an identity record
    pub fn with_identity(mut self, identity: IdentityClaim) -> Self {
        self.identities.get_or_insert_with(Vec::new).push(identity);
        self
    }

    /// The first identity record's access token, if there is a non-empty one
    pub fn first_access_token(&self) -> Option<&str> {
        self.identities
            .as_ref()?
            .first()?
            .access_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    /// Provider names of all identity records
    pub fn providers(&self) -> Vec<String> {
        self.identities
            .iter()
            .flatten()
            .filter_map(|identity| identity.provider.clone())
            .collect()
    }
}

/// Decode `identities`, treating any unexpected shape as absent
fn lenient_identities<'de, D>(deserializer: D) -> Result<Option<Vec<IdentityClaim>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(
        |value| match serde_json::from_value::<Vec<IdentityClaim>>(value) {
            Ok(identities) => Some(identities),
            Err(e) => {
                debug!("Ignoring identities claim with unexpected shape: {}", e);
                None
            }
        },
    ))
}
