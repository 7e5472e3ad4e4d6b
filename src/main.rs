// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the authentication gateway
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_auth_gateway::config::Config;
use rust_auth_gateway::server::{build_rocket, figment};
use rust_auth_gateway::store::InMemoryUserStore;

/// OAuth login gateway issuing session tokens
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the configuration file
    #[arg(short, long)]
    address: Option<String>,

    /// Listen port, overrides the configuration file
    #[arg(short, long)]
    port: Option<u16>,

    /// Validity of issued session tokens in seconds
    #[arg(long)]
    token_validity: Option<i64>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Validate a configuration file and exit
    #[arg(long, value_name = "FILE")]
    validate_config: Option<PathBuf>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        }
    }
}

#[rocket::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    if let Some(path) = &args.validate_config {
        return validate_config(path);
    }

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.apply_env();
    config.apply_args(args.address.clone(), args.port, args.token_validity);
    config
        .validate()
        .context("Configuration is not usable, refusing to start")?;

    info!(
        "Starting authentication gateway on {}:{}",
        config.server.address, config.server.port
    );
    let rocket = build_rocket(
        figment(&config.server),
        &config,
        Arc::new(InMemoryUserStore::new()),
    )?;
    let _rocket = rocket.launch().await?;
    Ok(())
}

/// Load `path`, apply the environment and report whether the result is usable
fn validate_config(path: &Path) -> Result<()> {
    let mut config = Config::from_file(path)?;
    config.apply_env();
    match config.validate() {
        Ok(()) => {
            info!("Configuration {:?} is valid", path);
            Ok(())
        }
        Err(e) => {
            error!("Configuration {:?} is invalid: {}", path, e);
            Err(e.into())
        }
    }
}
