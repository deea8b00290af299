//! In-memory user directory implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserDirectory, UserLookup};
use crate::domain::DomainError;

/// In-memory implementation of UserDirectory
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserDirectory {
    /// Create a directory with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Add a user
    pub async fn add(&self, user: User) {
        self.users.write().await.push(user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, lookup: &UserLookup) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| lookup.matches(u)).cloned().collect())
    }
}
