//! Migrate command - applies pending schema migrations

use std::process::ExitCode;

use crate::infrastructure::storage::{connect_pool, run_storage_migrations};

/// Run all pending migrations against the configured database
pub async fn run() -> anyhow::Result<ExitCode> {
    let config = super::bootstrap()?;

    let pool = connect_pool(&config.database.to_postgres_config()).await?;
    let applied = run_storage_migrations(&pool).await?;

    if applied.is_empty() {
        println!("Nothing to migrate.");
    }

    for version in applied {
        println!("Applied migration {}", version);
    }

    Ok(ExitCode::SUCCESS)
}
