//! API token issuance
//!
//! Resolves the owner, validates the request, generates a token ID and
//! secret, and persists the token with only a hash of the secret.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::api_token::{ApiToken, ApiTokenRepository, IssueTokenRequest, TokenId};
use crate::domain::user::{User, UserDirectory};
use crate::domain::DomainError;

use super::expiry::{DefaultExpiry, YearsFromToday};
use super::generator::{RandomTokenGenerator, TokenGenerator};
use super::hasher::{Argon2Hasher, SecretHasher};

/// Errors returned when issuing a token
#[derive(Debug, Error)]
pub enum IssueTokenError {
    /// The owner could not be resolved to exactly one user
    #[error("{0}")]
    UserNotFound(String),

    /// One or more request fields are invalid
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// The token store failed
    #[error("Failed to store API token: {0}")]
    Persistence(String),

    /// The secret could not be hashed
    #[error("Failed to hash API token secret: {0}")]
    Hashing(String),
}

impl IssueTokenError {
    /// Every message to report to the caller, in order
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    fn from_lookup(error: DomainError) -> Self {
        match error {
            DomainError::NotFound { message } | DomainError::Conflict { message } => {
                Self::UserNotFound(message)
            }
            other => Self::Persistence(other.message().to_string()),
        }
    }
}

impl From<DomainError> for IssueTokenError {
    fn from(error: DomainError) -> Self {
        Self::Persistence(error.message().to_string())
    }
}

/// A freshly issued token
///
/// This is the only place the plaintext secret is ever available.
pub struct IssuedApiToken {
    pub token: ApiToken,
    pub secret: String,
    pub user: User,
}

impl IssuedApiToken {
    pub fn token_id(&self) -> &TokenId {
        self.token.token_id()
    }

    pub fn expires_at(&self) -> NaiveDate {
        self.token.expires_at()
    }
}

impl std::fmt::Debug for IssuedApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedApiToken")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Issues API tokens for existing users
#[derive(Debug)]
pub struct ApiTokenIssuer {
    users: Arc<dyn UserDirectory>,
    tokens: Arc<dyn ApiTokenRepository>,
    generator: Arc<dyn TokenGenerator>,
    hasher: Arc<dyn SecretHasher>,
    default_expiry: Arc<dyn DefaultExpiry>,
}

impl ApiTokenIssuer {
    /// Create an issuer with random generation, default Argon2 cost and a
    /// 100 year default expiry
    pub fn new(users: Arc<dyn UserDirectory>, tokens: Arc<dyn ApiTokenRepository>) -> Self {
        Self {
            users,
            tokens,
            generator: Arc::new(RandomTokenGenerator::new()),
            hasher: Arc::new(Argon2Hasher::new()),
            default_expiry: Arc::new(YearsFromToday::default()),
        }
    }

    /// Use a custom token generator
    pub fn with_generator(mut self, generator: Arc<dyn TokenGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Use a custom secret hasher
    pub fn with_hasher(mut self, hasher: Arc<dyn SecretHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Use a custom default expiry policy
    pub fn with_default_expiry(mut self, default_expiry: Arc<dyn DefaultExpiry>) -> Self {
        self.default_expiry = default_expiry;
        self
    }

    /// Issue a new token
    ///
    /// Nothing is written unless every check passes. Only the token ID is
    /// regenerated on a collision; the secret is kept.
    pub async fn issue(&self, request: IssueTokenRequest) -> Result<IssuedApiToken, IssueTokenError> {
        let user = self
            .users
            .resolve(&request.owner)
            .await
            .map_err(IssueTokenError::from_lookup)?;

        let details = request.validated().map_err(IssueTokenError::Validation)?;
        let expires_at = details
            .expires_at
            .unwrap_or_else(|| self.default_expiry.default_expiry());

        let secret = self.generator.secret();
        let token_id = self.generator.token_id();
        let secret_hash = self
            .hasher
            .hash(&secret)
            .map_err(|e| IssueTokenError::Hashing(e.message().to_string()))?;

        let mut token = ApiToken::new(token_id, details.name, secret_hash, user.id(), expires_at);

        let stored = loop {
            while self.tokens.exists_by_token_id(token.token_id()).await? {
                debug!(token_id = %token.token_id(), "Token ID already in use, regenerating");
                token.set_token_id(self.generator.token_id());
            }

            match self.tokens.create(token.clone()).await {
                Ok(stored) => break stored,
                Err(e) if e.is_conflict() => {
                    warn!(
                        token_id = %token.token_id(),
                        "Token ID taken by a concurrent insert, regenerating"
                    );
                    token.set_token_id(self.generator.token_id());
                }
                Err(e) => return Err(e.into()),
            }
        };

        info!(
            token_id = %stored.token_id(),
            user_id = %user.id(),
            expires_at = %stored.expires_at(),
            "API token issued"
        );

        Ok(IssuedApiToken {
            token: stored,
            secret,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashingConfig;
    use crate::domain::api_token::MockApiTokenRepository;
    use crate::domain::user::{UserId, UserLookup};
    use crate::infrastructure::api_token::expiry::FixedExpiry;
    use crate::infrastructure::api_token::generator::MockTokenGenerator;
    use crate::infrastructure::api_token::InMemoryApiTokenRepository;
    use crate::infrastructure::user::InMemoryUserDirectory;
    use mockall::Sequence;

    fn default_expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2125, 1, 1).unwrap()
    }

    fn token_id(c: char) -> TokenId {
        TokenId::new(c.to_string().repeat(32)).unwrap()
    }

    fn fast_hasher() -> Arc<Argon2Hasher> {
        Arc::new(
            Argon2Hasher::with_config(&HashingConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            })
            .unwrap(),
        )
    }

    fn directory() -> Arc<InMemoryUserDirectory> {
        Arc::new(InMemoryUserDirectory::with_users(vec![
            User::new(UserId::new(7), "Test User", "test@example.com"),
            User::new(UserId::new(8), "Other User", "other@example.com"),
        ]))
    }

    fn issuer(tokens: Arc<dyn ApiTokenRepository>) -> ApiTokenIssuer {
        ApiTokenIssuer::new(directory(), tokens)
            .with_hasher(fast_hasher())
            .with_default_expiry(Arc::new(FixedExpiry(default_expiry())))
    }

    /// Generator that hands out the given IDs in order
    fn scripted_generator(ids: Vec<TokenId>) -> MockTokenGenerator {
        let mut generator = MockTokenGenerator::new();
        let mut ids = ids.into_iter();

        generator
            .expect_secret()
            .times(1)
            .returning(|| "S".repeat(32));
        generator
            .expect_token_id()
            .returning(move || ids.next().expect("generator script exhausted"));

        generator
    }

    fn request(name: Option<&str>, expires_at: Option<&str>) -> IssueTokenRequest {
        IssueTokenRequest::new(
            UserLookup::Id(7),
            name.map(String::from),
            expires_at.map(String::from),
        )
    }

    #[tokio::test]
    async fn test_issue_end_to_end() {
        let tokens = Arc::new(InMemoryApiTokenRepository::new());
        let issuer = issuer(tokens.clone());

        let issued = issuer.issue(request(Some("TestToken"), None)).await.unwrap();

        let stored = tokens
            .get_by_token_id(issued.token_id())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(stored.user_id(), UserId::new(7));
        assert_eq!(stored.name(), "TestToken");
        assert_eq!(stored.expires_at(), default_expiry());
        assert_eq!(stored.token_id().as_str().len(), 32);
        assert_ne!(stored.secret_hash(), issued.secret);
        assert_eq!(issued.user.email(), "test@example.com");
        assert_eq!(tokens.len().await, 1);
    }

    #[tokio::test]
    async fn test_issued_values_are_alphanumeric_and_distinct() {
        let issuer = issuer(Arc::new(InMemoryApiTokenRepository::new()));

        let issued = issuer.issue(request(Some("TestToken"), None)).await.unwrap();
        let id = issued.token_id().as_str();

        assert_eq!(id.len(), 32);
        assert_eq!(issued.secret.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(issued.secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, issued.secret);
    }

    #[tokio::test]
    async fn test_stored_hash_verifies_secret() {
        let tokens = Arc::new(InMemoryApiTokenRepository::new());
        let hasher = fast_hasher();
        let issuer = issuer(tokens.clone()).with_hasher(hasher.clone());

        let issued = issuer.issue(request(Some("TestToken"), None)).await.unwrap();
        let stored = tokens.get_by_token_id(issued.token_id()).await.unwrap().unwrap();

        assert!(stored.secret_hash().starts_with("$argon2id$"));
        assert!(!stored.secret_hash().contains(&issued.secret));
        assert!(hasher.verify(&issued.secret, stored.secret_hash()));
    }

    #[tokio::test]
    async fn test_explicit_expiry_is_used() {
        let tokens = Arc::new(InMemoryApiTokenRepository::new());
        let issuer = issuer(tokens.clone());

        let issued = issuer
            .issue(request(Some("TestToken"), Some("2030-06-15")))
            .await
            .unwrap();

        assert_eq!(
            issued.expires_at(),
            NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
        );
    }

    #[tokio::test]
    async fn test_lookup_by_email() {
        let issuer = issuer(Arc::new(InMemoryApiTokenRepository::new()));
        let request = IssueTokenRequest::new(
            UserLookup::Email("other@example.com".into()),
            Some("TestToken".into()),
            None,
        );

        let issued = issuer.issue(request).await.unwrap();
        assert_eq!(issued.token.user_id(), UserId::new(8));
    }

    #[tokio::test]
    async fn test_overlong_name_persists_nothing() {
        let tokens = Arc::new(InMemoryApiTokenRepository::new());
        let issuer = issuer(tokens.clone());
        let name = "n".repeat(251);

        let result = issuer.issue(request(Some(&name), None)).await;

        assert!(matches!(result, Err(IssueTokenError::Validation(_))));
        assert!(tokens.is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_expiry_persists_nothing() {
        let tokens = Arc::new(InMemoryApiTokenRepository::new());
        let issuer = issuer(tokens.clone());

        let result = issuer
            .issue(request(Some("TestToken"), Some("31-12-2024")))
            .await;

        assert!(matches!(result, Err(IssueTokenError::Validation(_))));
        assert!(tokens.is_empty().await);
    }

    #[tokio::test]
    async fn test_validation_runs_before_generation() {
        let mut generator = MockTokenGenerator::new();
        generator.expect_secret().never();
        generator.expect_token_id().never();

        let mut tokens = MockApiTokenRepository::new();
        tokens.expect_exists_by_token_id().never();
        tokens.expect_create().never();

        let issuer = issuer(Arc::new(tokens)).with_generator(Arc::new(generator));
        let err = issuer.issue(request(None, Some("2024/12/31"))).await.unwrap_err();

        assert_eq!(
            err.messages(),
            vec![
                "The name field is required.",
                "The expires at field must match the format YYYY-MM-DD.",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let tokens = Arc::new(InMemoryApiTokenRepository::new());
        let issuer = issuer(tokens.clone());
        let request = IssueTokenRequest::new(UserLookup::Id(99), Some("TestToken".into()), None);

        let err = issuer.issue(request).await.unwrap_err();

        assert!(matches!(err, IssueTokenError::UserNotFound(_)));
        assert_eq!(err.messages(), vec!["A user where id=99 could not be found."]);
        assert!(tokens.is_empty().await);
    }

    #[tokio::test]
    async fn test_colliding_token_id_is_regenerated() {
        let taken = token_id('x');
        let existing = ApiToken::new(
            taken.clone(),
            "Existing",
            "hash",
            UserId::new(8),
            default_expiry(),
        );
        let tokens = Arc::new(InMemoryApiTokenRepository::with_tokens(vec![existing]));
        let generator = scripted_generator(vec![taken.clone(), taken.clone(), token_id('y')]);

        let issuer = issuer(tokens.clone()).with_generator(Arc::new(generator));
        let issued = issuer.issue(request(Some("TestToken"), None)).await.unwrap();

        assert_eq!(issued.token_id(), &token_id('y'));
        assert_eq!(issued.secret, "S".repeat(32));
        assert_eq!(tokens.len().await, 2);

        let existing = tokens.get_by_token_id(&taken).await.unwrap().unwrap();
        assert_eq!(existing.name(), "Existing");
    }

    #[tokio::test]
    async fn test_insert_follows_negative_existence_check() {
        let mut seq = Sequence::new();
        let mut tokens = MockApiTokenRepository::new();

        tokens
            .expect_exists_by_token_id()
            .withf(|id| id == &token_id('x'))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        tokens
            .expect_exists_by_token_id()
            .withf(|id| id == &token_id('y'))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        tokens
            .expect_create()
            .withf(|token| token.token_id() == &token_id('y'))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|token| Ok(token.with_id(1)));

        let generator = scripted_generator(vec![token_id('x'), token_id('y')]);
        let issuer = issuer(Arc::new(tokens)).with_generator(Arc::new(generator));

        let issued = issuer.issue(request(Some("TestToken"), None)).await.unwrap();
        assert_eq!(issued.token.id(), Some(1));
    }

    #[tokio::test]
    async fn test_insert_conflict_is_retried_with_new_token_id() {
        let mut seq = Sequence::new();
        let mut tokens = MockApiTokenRepository::new();

        tokens
            .expect_exists_by_token_id()
            .withf(|id| id == &token_id('x'))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        tokens
            .expect_create()
            .withf(|token| token.token_id() == &token_id('x'))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DomainError::conflict("duplicate token_id")));
        tokens
            .expect_exists_by_token_id()
            .withf(|id| id == &token_id('y'))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        tokens
            .expect_create()
            .withf(|token| token.token_id() == &token_id('y'))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|token| Ok(token.with_id(2)));

        let generator = scripted_generator(vec![token_id('x'), token_id('y')]);
        let issuer = issuer(Arc::new(tokens)).with_generator(Arc::new(generator));

        let issued = issuer.issue(request(Some("TestToken"), None)).await.unwrap();

        assert_eq!(issued.token_id(), &token_id('y'));
        assert_eq!(issued.secret, "S".repeat(32));
    }

    #[tokio::test]
    async fn test_storage_failure_is_persistence_error() {
        let mut tokens = MockApiTokenRepository::new();
        tokens.expect_exists_by_token_id().returning(|_| Ok(false));
        tokens
            .expect_create()
            .times(1)
            .returning(|_| Err(DomainError::storage("connection reset")));

        let issuer = issuer(Arc::new(tokens));
        let err = issuer.issue(request(Some("TestToken"), None)).await.unwrap_err();

        assert!(matches!(err, IssueTokenError::Persistence(_)));
        assert_eq!(
            err.messages(),
            vec!["Failed to store API token: connection reset"]
        );
    }

    #[derive(Debug)]
    struct FailingHasher;

    impl SecretHasher for FailingHasher {
        fn hash(&self, _secret: &str) -> Result<String, DomainError> {
            Err(DomainError::internal("boom"))
        }

        fn verify(&self, _secret: &str, _hash: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_hashing_failure_persists_nothing() {
        let tokens = Arc::new(InMemoryApiTokenRepository::new());
        let issuer = issuer(tokens.clone()).with_hasher(Arc::new(FailingHasher));

        let err = issuer.issue(request(Some("TestToken"), None)).await.unwrap_err();

        assert!(matches!(err, IssueTokenError::Hashing(_)));
        assert_eq!(err.messages(), vec!["Failed to hash API token secret: boom"]);
        assert!(tokens.is_empty().await);
    }

    #[tokio::test]
    async fn test_ambiguous_owner_is_user_not_found() {
        let users = Arc::new(InMemoryUserDirectory::with_users(vec![
            User::new(UserId::new(1), "First", "shared@example.com"),
            User::new(UserId::new(2), "Second", "SHARED@example.com"),
        ]));
        let tokens = Arc::new(InMemoryApiTokenRepository::new());
        let issuer = ApiTokenIssuer::new(users, tokens.clone()).with_hasher(fast_hasher());
        let request = IssueTokenRequest::new(
            UserLookup::Email("shared@example.com".into()),
            Some("TestToken".into()),
            None,
        );

        let err = issuer.issue(request).await.unwrap_err();

        assert!(matches!(err, IssueTokenError::UserNotFound(_)));
        assert_eq!(
            err.messages(),
            vec!["2 users match email=shared@example.com, a unique user is required."]
        );
        assert!(tokens.is_empty().await);
    }

    #[test]
    fn test_issuer_debug_lists_collaborators() {
        let issuer = issuer(Arc::new(InMemoryApiTokenRepository::new()));
        let debug = format!("{:?}", issuer);

        assert!(debug.starts_with("ApiTokenIssuer"));
        assert!(debug.contains("Argon2Hasher"));
        assert!(debug.contains("FixedExpiry"));
    }

    #[test]
    fn test_issued_token_debug_redacts_secret() {
        let issued = IssuedApiToken {
            token: ApiToken::new(token_id('a'), "T", "hash", UserId::new(7), default_expiry()),
            secret: "TopSecretValue".to_string(),
            user: User::new(UserId::new(7), "Test User", "test@example.com"),
        };

        let debug = format!("{:?}", issued);
        assert!(!debug.contains("TopSecretValue"));
        assert!(debug.contains("<redacted>"));
    }
}
