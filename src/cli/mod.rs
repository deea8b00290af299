//! CLI module for the API token issuer
//!
//! Subcommands:
//! - `create-api-token`: issue a token for an existing user
//! - `migrate`: apply pending database migrations

pub mod create_token;
pub mod migrate;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// API Token Issuer - create API tokens for existing users
#[derive(Parser)]
#[command(name = "api-token-issuer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an API token for a user
    CreateApiToken(create_token::CreateApiTokenArgs),

    /// Apply pending database migrations
    Migrate,
}

/// Load `.env`, configuration and logging shared by every subcommand
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}
