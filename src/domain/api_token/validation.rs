//! API token validation utilities

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Length of both the public token ID and the plaintext secret
pub const TOKEN_LENGTH: usize = 32;

/// Maximum length of a token display name, in characters
pub const MAX_TOKEN_NAME_LENGTH: usize = 250;

/// `chrono` format of the expiry date accepted from callers
pub const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) static EXPIRY_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("expiry date pattern is valid"));

/// Errors that can occur during API token validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiTokenValidationError {
    #[error("Token ID must be exactly {0} characters long")]
    InvalidLength(usize),

    #[error("Token ID contains invalid character: '{0}'. Only ASCII letters and digits are allowed")]
    InvalidCharacter(char),
}

/// Validate a public token ID
///
/// Rules:
/// - Exactly 32 characters
/// - Only ASCII letters and digits
pub fn validate_token_id(id: &str) -> Result<(), ApiTokenValidationError> {
    if let Some(c) = id.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(ApiTokenValidationError::InvalidCharacter(c));
    }

    if id.len() != TOKEN_LENGTH {
        return Err(ApiTokenValidationError::InvalidLength(TOKEN_LENGTH));
    }

    Ok(())
}

/// Parse a `YYYY-MM-DD` expiry date
///
/// The shape is checked first so that looser inputs chrono would accept
/// (single-digit months, signed years) are still rejected.
pub fn parse_expiry_date(raw: &str) -> Option<NaiveDate> {
    if !EXPIRY_DATE_PATTERN.is_match(raw) {
        return None;
    }

    NaiveDate::parse_from_str(raw, EXPIRY_DATE_FORMAT).ok()
}
