//! User directory implementations

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresUserDirectory;
pub use repository::InMemoryUserDirectory;
