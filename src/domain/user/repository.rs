//! User directory trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserLookup};
use crate::domain::DomainError;

/// Read-only access to the users tokens can be issued for
#[async_trait]
pub trait UserDirectory: Send + Sync + Debug {
    /// Find every user matching the lookup
    async fn find(&self, lookup: &UserLookup) -> Result<Vec<User>, DomainError>;

    /// Resolve the lookup to exactly one user
    ///
    /// Returns `NotFound` when nothing matches and `Conflict` when the
    /// lookup is ambiguous.
    async fn resolve(&self, lookup: &UserLookup) -> Result<User, DomainError> {
        let mut users = self.find(lookup).await?;

        match users.len() {
            0 => Err(DomainError::not_found(format!(
                "A user where {} could not be found.",
                lookup
            ))),
            1 => Ok(users.remove(0)),
            n => Err(DomainError::conflict(format!(
                "{} users match {}, a unique user is required.",
                n, lookup
            ))),
        }
    }
}
