// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! HTTP server
//!
//! Assembles the Rocket instance: managed state, the login route, the
//! protected `/api` routes, the JSON error catcher and the request logger.

mod builder;
mod catchers;
mod fairings;
pub mod handlers;

pub use builder::{build_rocket, figment};
pub use catchers::default_catcher;
pub use fairings::RequestLogger;
