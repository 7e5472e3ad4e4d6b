// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::{Context, Result};
use clap::Parser;

use rust_auth_gateway::auth::{ClaimSet, IdentityClaim, TokenCodec};
use rust_auth_gateway::config::{AccessConfig, AUTH_SECRET_ENV};

/// Mint a session token accepted by the gateway
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Subject of the token, usually `<provider>|<id>`
    #[clap(long)]
    user_id: String,

    /// Upstream access token to embed in the `identities` claim
    #[clap(long)]
    access_token: Option<String>,

    /// Identity provider of the embedded record
    #[clap(long, default_value = "github")]
    provider: String,

    /// Token validity in seconds
    #[clap(long, default_value = "86400")]
    validity: i64,

    /// Base64url signing secret, defaults to the AUTH_SECRET environment variable
    #[clap(long)]
    secret: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let access = AccessConfig {
        secret: args
            .secret
            .or_else(|| std::env::var(AUTH_SECRET_ENV).ok())
            .unwrap_or_default(),
        token_validity: args.validity,
    };
    let secret = access
        .decode_secret()
        .context("A signing secret is required, use --secret or AUTH_SECRET")?;

    let mut claims = ClaimSet::for_subject(&args.user_id);
    if let Some(access_token) = &args.access_token {
        let native_id = args
            .user_id
            .split_once('|')
            .map(|(_, id)| id)
            .unwrap_or(&args.user_id);
        claims = claims.with_identity(IdentityClaim::new(&args.provider, native_id, access_token));
    }

    let validity = access.validity().context("Invalid --validity")?;
    let token = TokenCodec::new(&secret, validity)
        .sign(&claims)
        .context("Failed to sign the token")?;
    println!("{}", token);
    Ok(())
}
