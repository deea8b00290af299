//! PostgreSQL API token repository implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::api_token::{ApiToken, ApiTokenRepository, TokenId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of ApiTokenRepository
///
/// Relies on the unique index on `api_tokens.token_id`; a violation is
/// reported as [`DomainError::Conflict`].
#[derive(Debug, Clone)]
pub struct PostgresApiTokenRepository {
    pool: PgPool,
}

impl PostgresApiTokenRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiTokenRepository for PostgresApiTokenRepository {
    async fn exists_by_token_id(&self, token_id: &TokenId) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM api_tokens WHERE token_id = $1)")
            .bind(token_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check API token: {}", e)))
    }

    async fn create(&self, token: ApiToken) -> Result<ApiToken, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO api_tokens (name, token_id, secret, user_id, expires_at,
                                    created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(token.name())
        .bind(token.token_id().as_str())
        .bind(token.secret_hash())
        .bind(token.user_id().value())
        .bind(token.expires_at())
        .bind(token.created_at())
        .bind(token.updated_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::conflict(
                format!("API token with ID '{}' already exists", token.token_id()),
            ),
            _ => DomainError::storage(format!("Failed to create API token: {}", e)),
        })?;

        Ok(token.with_id(id))
    }

    async fn get_by_token_id(&self, token_id: &TokenId) -> Result<Option<ApiToken>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, token_id, secret, user_id, expires_at, created_at, updated_at
            FROM api_tokens
            WHERE token_id = $1
            "#,
        )
        .bind(token_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API token: {}", e)))?;

        row.as_ref().map(row_to_token).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApiToken>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, token_id, secret, user_id, expires_at, created_at, updated_at
            FROM api_tokens
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list API tokens: {}", e)))?;

        rows.iter().map(row_to_token).collect()
    }
}

fn row_to_token(row: &PgRow) -> Result<ApiToken, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Failed to read API token row: {}", e));

    let id: i64 = row.try_get("id").map_err(map_err)?;
    let name: String = row.try_get("name").map_err(map_err)?;
    let token_id: String = row.try_get("token_id").map_err(map_err)?;
    let secret: String = row.try_get("secret").map_err(map_err)?;
    let user_id: i64 = row.try_get("user_id").map_err(map_err)?;
    let expires_at: NaiveDate = row.try_get("expires_at").map_err(map_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_err)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(map_err)?;

    let token_id = TokenId::new(token_id)
        .map_err(|e| DomainError::storage(format!("Stored token ID is invalid: {}", e)))?;

    Ok(
        ApiToken::new(token_id, name, secret, UserId::new(user_id), expires_at)
            .with_id(id)
            .with_timestamps(created_at, updated_at),
    )
}
