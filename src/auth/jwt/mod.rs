// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session token management
//!
//! This submodule handles session token creation, verification, and the typed
//! claim set embedded in the tokens.

mod claims;
mod codec;

// Re-export public API
pub use claims::{ClaimSet, IdentityClaim};
pub use codec::{sign, verify, TokenCodec};
