// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authentication and authorization
//!
//! - [`jwt`]: session token signing and verification
//! - [`oauth`]: authorization-code exchange with identity providers
//! - [`guards`]: the request filter chain protecting routes
//! - [`login`]: the login endpoint tying it all together

pub mod context;
pub mod error;
pub mod guards;
pub mod jwt;
pub mod login;
pub mod oauth;

pub use context::{CredentialContext, RequestAuthState, UpstreamCredential};
pub use error::{AuthError, ErrorEnvelope};
pub use guards::{Authenticated, UpstreamCall};
pub use jwt::{ClaimSet, IdentityClaim, TokenCodec};
pub use login::{AuthResponse, LoginService};
pub use oauth::{CallerIdentity, GithubProvider, OAuthProvider, ProviderProfile, ProviderRegistry};
