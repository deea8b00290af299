//! API token infrastructure
//!
//! Issuance service plus the generator, hasher and expiry policies it is
//! built from, and in-memory and PostgreSQL token stores.

mod expiry;
mod generator;
mod hasher;
mod issuer;
mod postgres_repository;
mod repository;

pub use expiry::{DefaultExpiry, FixedExpiry, YearsFromToday};
pub use generator::{RandomTokenGenerator, TokenGenerator};
pub use hasher::{Argon2Hasher, SecretHasher};
pub use issuer::{ApiTokenIssuer, IssueTokenError, IssuedApiToken};
pub use postgres_repository::PostgresApiTokenRepository;
pub use repository::InMemoryApiTokenRepository;
