//! API token entity and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_token_id, ApiTokenValidationError};
use crate::domain::user::UserId;

/// Public token identifier - exactly 32 ASCII letters and digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId(String);

impl TokenId {
    /// Create a new TokenId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiTokenValidationError> {
        let id = id.into();
        validate_token_id(&id)?;
        Ok(Self(id))
    }

    /// Wrap a value produced by a trusted generator
    pub(crate) fn from_generated(id: String) -> Self {
        debug_assert!(validate_token_id(&id).is_ok());
        Self(id)
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TokenId {
    type Error = ApiTokenValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TokenId> for String {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// API token entity
#[derive(Debug, Clone, Serialize)]
pub struct ApiToken {
    /// Storage-assigned row id, `None` until persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    /// Display name for the token
    name: String,
    /// Public lookup key
    token_id: TokenId,
    /// Argon2 hash of the secret - never exposed in serialization
    #[serde(skip_serializing)]
    secret_hash: String,
    /// Owning user
    user_id: UserId,
    /// Last day the token is valid
    expires_at: NaiveDate,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl ApiToken {
    /// Create a new, not yet persisted, API token
    pub fn new(
        token_id: TokenId,
        name: impl Into<String>,
        secret_hash: impl Into<String>,
        user_id: UserId,
        expires_at: NaiveDate,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: None,
            name: name.into(),
            token_id,
            secret_hash: secret_hash.into(),
            user_id,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the storage-assigned row id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set timestamps, used when rehydrating from storage
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn expires_at(&self) -> NaiveDate {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the public identifier before the token is persisted
    pub fn set_token_id(&mut self, token_id: TokenId) {
        self.token_id = token_id;
    }
}
