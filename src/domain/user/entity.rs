//! User entity and lookup criteria

use serde::{Deserialize, Serialize};

/// Numeric user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user that API tokens can be issued for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// How the target user of an operation is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// By numeric user id
    Id(i64),
    /// By email address, compared case-insensitively
    Email(String),
}

impl UserLookup {
    /// Name of the field the lookup matches on
    pub fn field(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Email(_) => "email",
        }
    }

    /// Check whether a user matches this lookup
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Id(id) => user.id().value() == *id,
            Self::Email(email) => user.email().eq_ignore_ascii_case(email),
        }
    }
}

impl std::fmt::Display for UserLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}={}", self.field(), id),
            Self::Email(email) => write!(f, "{}={}", self.field(), email),
        }
    }
}
