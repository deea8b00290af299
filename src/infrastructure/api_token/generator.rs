//! API token generation
//!
//! Generates public token IDs and secrets from a cryptographically secure RNG.

use rand::{distributions::Alphanumeric, Rng};
use std::fmt::Debug;

use crate::domain::api_token::{TokenId, TOKEN_LENGTH};

#[cfg(test)]
use mockall::automock;

/// Source of fresh token IDs and secrets
#[cfg_attr(test, automock)]
pub trait TokenGenerator: Send + Sync + Debug {
    /// Generate a new public token ID
    fn token_id(&self) -> TokenId;

    /// Generate a new plaintext secret
    fn secret(&self) -> String;
}

/// Generator drawing 32 characters from `[A-Za-z0-9]`
#[derive(Debug, Clone, Default)]
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    fn random_string(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn token_id(&self) -> TokenId {
        TokenId::from_generated(self.random_string())
    }

    fn secret(&self) -> String {
        self.random_string()
    }
}
