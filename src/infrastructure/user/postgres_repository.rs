//! PostgreSQL user directory implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::user::{User, UserDirectory, UserId, UserLookup};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserDirectory
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Create a new directory with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find(&self, lookup: &UserLookup) -> Result<Vec<User>, DomainError> {
        let rows = match lookup {
            UserLookup::Id(id) => {
                sqlx::query("SELECT id, name, email FROM users WHERE id = $1")
                    .bind(*id)
                    .fetch_all(&self.pool)
                    .await
            }
            UserLookup::Email(email) => {
                sqlx::query(
                    "SELECT id, name, email FROM users WHERE lower(email) = lower($1) ORDER BY id",
                )
                .bind(email)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to look up user: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Failed to read user row: {}", e));

    let id: i64 = row.try_get("id").map_err(map_err)?;
    let name: String = row.try_get("name").map_err(map_err)?;
    let email: String = row.try_get("email").map_err(map_err)?;

    Ok(User::new(UserId::new(id), name, email))
}
