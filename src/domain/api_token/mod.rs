//! API token domain
//!
//! Domain types and traits for issuing API tokens: the persisted token
//! entity, the issuance request with its field validation, and the
//! storage contract.

mod entity;
mod repository;
mod request;
mod validation;

pub use entity::{ApiToken, TokenId};
pub use repository::ApiTokenRepository;
pub use request::{IssueTokenRequest, TokenDetails};
pub use validation::{
    parse_expiry_date, validate_token_id, ApiTokenValidationError, EXPIRY_DATE_FORMAT,
    MAX_TOKEN_NAME_LENGTH, TOKEN_LENGTH,
};

#[cfg(test)]
pub use repository::MockApiTokenRepository;
