//! Domain layer - Core entities, validation and storage contracts

pub mod api_token;
pub mod error;
pub mod user;

pub use api_token::{
    ApiToken, ApiTokenRepository, ApiTokenValidationError, IssueTokenRequest, TokenDetails,
    TokenId,
};
pub use error::DomainError;
pub use user::{User, UserDirectory, UserId, UserLookup};
