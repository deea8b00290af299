//! API Token Issuer
//!
//! Issues named, expiring API tokens for existing users. Each token is a
//! public token ID plus a secret that is shown once and stored only as an
//! Argon2 hash.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use infrastructure::api_token::{
    ApiTokenIssuer, Argon2Hasher, PostgresApiTokenRepository, YearsFromToday,
};
use infrastructure::storage::connect_pool;
use infrastructure::user::PostgresUserDirectory;

/// Create a Postgres-backed token issuer from configuration
pub async fn create_issuer_with_config(config: &AppConfig) -> anyhow::Result<ApiTokenIssuer> {
    let hasher = Argon2Hasher::with_config(&config.hashing)?;
    let pool = connect_pool(&config.database.to_postgres_config()).await?;

    let users = Arc::new(PostgresUserDirectory::new(pool.clone()));
    let tokens = Arc::new(PostgresApiTokenRepository::new(pool));

    Ok(ApiTokenIssuer::new(users, tokens)
        .with_hasher(Arc::new(hasher))
        .with_default_expiry(Arc::new(YearsFromToday::new(
            config.tokens.default_expiry_years,
        ))))
}
