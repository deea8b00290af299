//! In-memory API token repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_token::{ApiToken, ApiTokenRepository, TokenId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of ApiTokenRepository
#[derive(Debug)]
pub struct InMemoryApiTokenRepository {
    tokens: Arc<RwLock<HashMap<String, ApiToken>>>,
    next_id: AtomicI64,
}

impl InMemoryApiTokenRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Create a repository with initial tokens
    pub fn with_tokens(tokens: Vec<ApiToken>) -> Self {
        let next_id = tokens.len() as i64 + 1;
        let map: HashMap<String, ApiToken> = tokens
            .into_iter()
            .zip(1..)
            .map(|(token, id)| (token.token_id().as_str().to_string(), token.with_id(id)))
            .collect();

        Self {
            tokens: Arc::new(RwLock::new(map)),
            next_id: AtomicI64::new(next_id),
        }
    }

    /// Number of stored tokens
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

impl Default for InMemoryApiTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiTokenRepository for InMemoryApiTokenRepository {
    async fn exists_by_token_id(&self, token_id: &TokenId) -> Result<bool, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.contains_key(token_id.as_str()))
    }

    async fn create(&self, token: ApiToken) -> Result<ApiToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        let key = token.token_id().as_str().to_string();

        if tokens.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "API token with ID '{}' already exists",
                key
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = token.with_id(id);
        tokens.insert(key, stored.clone());

        Ok(stored)
    }

    async fn get_by_token_id(&self, token_id: &TokenId) -> Result<Option<ApiToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_id.as_str()).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApiToken>, DomainError> {
        let tokens = self.tokens.read().await;

        let mut result: Vec<ApiToken> = tokens
            .values()
            .filter(|t| t.user_id() == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|t| t.id());

        Ok(result)
    }
}
