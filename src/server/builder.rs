// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::{Context, Result};
use log::info;
use rocket::config::LogLevel;
use rocket::figment::Figment;
use rocket::{catchers, routes, Build, Rocket};
use std::sync::Arc;
use std::time::Duration;

use super::catchers::default_catcher;
use super::fairings::RequestLogger;
use super::handlers;
use crate::auth::login;
use crate::auth::{GithubProvider, LoginService, ProviderRegistry, TokenCodec};
use crate::config::{Config, ServerConfig};
use crate::store::UserStore;

/// Rocket figment for the configured listener
pub fn figment(server: &ServerConfig) -> Figment {
    rocket::Config::figment()
        .merge(("ident", server.name.clone()))
        .merge(("address", server.address.clone()))
        .merge(("port", server.port))
        .merge(("log_level", LogLevel::Normal))
}

/// Build the gateway
///
/// The token codec, the provider registry and the login service are managed
/// state shared by every request. Fails when the signing secret does not
/// decode, the token validity is unusable or the GitHub client cannot be
/// built.
pub fn build_rocket(
    figment: Figment,
    config: &Config,
    store: Arc<dyn UserStore>,
) -> Result<Rocket<Build>> {
    let secret = config
        .access
        .decode_secret()
        .context("Invalid access configuration")?;
    let validity = config
        .access
        .validity()
        .context("Invalid access configuration")?;
    let codec = TokenCodec::new(&secret, validity);

    let github = GithubProvider::new(&config.github).context("Failed to set up the GitHub provider")?;
    let providers = ProviderRegistry::new().with(Arc::new(github));
    info!("Identity providers: {}", providers.names().join(", "));

    let login_service = LoginService::new(providers.clone(), codec.clone(), store)
        .with_store_timeout(Duration::from_secs(config.store.timeout));

    let rocket = rocket::custom(figment)
        .attach(RequestLogger)
        .mount("/", routes![login::login])
        .mount("/api", routes![handlers::me, handlers::upstream_user])
        .register("/", catchers![default_catcher])
        .manage(codec)
        .manage(providers)
        .manage(login_service);
    Ok(rocket)
}
