// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rust Auth Gateway library
//!
//! OAuth login against an identity provider, stateless session tokens and a
//! request filter chain that exposes the caller's upstream credential to the
//! routes acting on their behalf.

pub mod auth;
pub mod config;
pub mod server;
pub mod store;
