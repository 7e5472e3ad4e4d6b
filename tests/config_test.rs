// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rocket::figment::Figment;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

use rust_auth_gateway::config::{Config, ConfigError};
use rust_auth_gateway::server::build_rocket;
use rust_auth_gateway::store::InMemoryUserStore;

#[test]
fn test_config_loading_from_yaml() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(
        &config_path,
        r#"
server:
  address: 0.0.0.0
  port: 9090
access:
  secret: c2hhcmVkLXNlY3JldA
  token_validity: 600
github:
  client_id: Iv1.abc
  client_secret: shh
  timeout: 3
"#,
    )?;

    let config = Config::from_file(&config_path)?;
    assert_eq!(config.server.address, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.access.token_validity, 600);
    assert_eq!(config.access.decode_secret()?, b"shared-secret");
    assert_eq!(config.github.client_id, "Iv1.abc");
    assert_eq!(config.github.timeout, 3);
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.store.timeout, 5);
    config.validate()?;
    Ok(())
}

#[test]
fn test_environment_wins_over_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "access:\n  secret: ZmlsZQ\n")?;

    let mut config = Config::from_file(&config_path)?;
    config.apply_env_from(|name| match name {
        "AUTH_SECRET" => Some("ZW52".to_string()),
        "GITHUB_CLIENT_ID" => Some(String::new()),
        _ => None,
    });
    assert_eq!(config.access.decode_secret()?, b"env");
    assert!(config.github.client_id.is_empty());
    Ok(())
}

#[test]
fn test_invalid_yaml_is_reported() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "server:\n  port: not-a-port\n")?;

    let err = Config::from_file(&config_path).expect_err("port must be a number");
    assert!(format!("{:#}", err).contains("Failed to parse YAML"));
    assert!(Config::from_file(temp_dir.path().join("missing.yaml")).is_err());
    Ok(())
}

#[test]
fn test_missing_or_invalid_secret_is_fatal() {
    let mut config = Config::default();
    assert!(matches!(config.validate(), Err(ConfigError::MissingSecret)));

    config.access.secret = "not base64!".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidSecret(_))));

    let built = build_rocket(
        Figment::from(rocket::Config::default()),
        &config,
        Arc::new(InMemoryUserStore::new()),
    );
    assert!(built.is_err());
}

#[test]
fn test_out_of_range_token_validity_is_an_error() {
    let mut config = Config::default();
    config.access.secret = "c2hhcmVkLXNlY3JldA".to_string();
    config.access.token_validity = i64::MAX;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTokenValidity(_))
    ));

    let built = build_rocket(
        Figment::from(rocket::Config::default()),
        &config,
        Arc::new(InMemoryUserStore::new()),
    );
    let err = built.expect_err("gateway must refuse the validity");
    assert!(format!("{:#}", err).contains("token validity"));
}
