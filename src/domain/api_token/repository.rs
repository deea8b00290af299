//! API token repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiToken, TokenId};
use crate::domain::DomainError;
use crate::domain::user::UserId;

#[cfg(test)]
use mockall::automock;

/// Repository trait for API token storage
///
/// Implementations must reject a second token with the same [`TokenId`]
/// by returning [`DomainError::Conflict`] from `create`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiTokenRepository: Send + Sync + Debug {
    /// Check whether a token with the given public ID already exists
    async fn exists_by_token_id(&self, token_id: &TokenId) -> Result<bool, DomainError>;

    /// Persist a new token, returning it with its storage-assigned id
    async fn create(&self, token: ApiToken) -> Result<ApiToken, DomainError>;

    /// Get a token by its public ID
    async fn get_by_token_id(&self, token_id: &TokenId) -> Result<Option<ApiToken>, DomainError>;

    /// List all tokens owned by a user
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApiToken>, DomainError>;
}
