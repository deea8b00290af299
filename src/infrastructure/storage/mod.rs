//! Storage infrastructure - PostgreSQL connection and schema

pub mod migrations;
mod postgres;

pub use migrations::{run_storage_migrations, storage_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig};
