// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

#![allow(dead_code)]

use chrono::Duration;
use rocket::config::LogLevel;
use rocket::local::asynchronous::Client;
use std::sync::{Arc, Once};

use rust_auth_gateway::auth::jwt;
use rust_auth_gateway::auth::{ClaimSet, IdentityClaim};
use rust_auth_gateway::config::Config;
use rust_auth_gateway::server::build_rocket;
use rust_auth_gateway::store::InMemoryUserStore;

/// Raw signing secret shared by the gateway and the tests
pub const SECRET: &[u8] = b"test-gateway-secret";
/// `SECRET` as configured, base64url with padding
pub const SECRET_B64: &str = "dGVzdC1nYXRld2F5LXNlY3JldA==";

static INIT: Once = Once::new();

pub fn setup() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

/// Gateway configuration pointing the GitHub provider at `idp`
pub fn config(idp: &str) -> Config {
    let mut config = Config::default();
    config.access.secret = SECRET_B64.to_string();
    config.github.client_id = "client-id".to_string();
    config.github.client_secret = "client-secret".to_string();
    config.github.token_url = format!("{}/login/oauth/access_token", idp);
    config.github.api_url = idp.to_string();
    config.github.timeout = 2;
    config.store.timeout = 2;
    config
}

/// Local client over a fully built gateway
pub async fn client(config: &Config, store: Arc<InMemoryUserStore>) -> Client {
    setup();
    let figment = rocket::Config::figment()
        .merge(("port", 0))
        .merge(("log_level", LogLevel::Off));
    let rocket = build_rocket(figment, config, store).expect("gateway builds");
    Client::tracked(rocket).await.expect("valid rocket instance")
}

/// Session token for `sub` carrying `access_token` as its upstream credential
pub fn token_with_credential(sub: &str, access_token: &str) -> String {
    let native_id = sub.split_once('|').map(|(_, id)| id).unwrap_or(sub);
    let claims = ClaimSet::for_subject(sub)
        .with_identity(IdentityClaim::new("github", native_id, access_token));
    jwt::sign(&claims, SECRET, Duration::hours(1)).expect("token signs")
}

/// Session token without any identity record
pub fn token_without_identities(sub: &str) -> String {
    jwt::sign(&ClaimSet::for_subject(sub), SECRET, Duration::hours(1)).expect("token signs")
}
