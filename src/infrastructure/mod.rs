//! Infrastructure layer - Storage backends, hashing and issuance

pub mod api_token;
pub mod logging;
pub mod storage;
pub mod user;
