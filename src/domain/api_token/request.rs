//! Token issuance request and field validation

use chrono::NaiveDate;
use validator::{Validate, ValidationError};

use super::validation::{parse_expiry_date, EXPIRY_DATE_PATTERN};
use crate::domain::user::UserLookup;

const NAME_FIELD: &str = "name";
const EXPIRES_AT_FIELD: &str = "expires_at";

/// Caller input for issuing a new API token
///
/// `name` and `expires_at` are kept raw so that every problem can be
/// reported together instead of failing on the first one.
#[derive(Debug, Clone, Validate)]
pub struct IssueTokenRequest {
    /// User the token is issued for
    pub owner: UserLookup,
    /// Display name for the token
    #[validate(
        required(message = "The name field is required."),
        length(max = 250, message = "The name may not be greater than 250 characters.")
    )]
    pub name: Option<String>,
    /// Expiry date in `YYYY-MM-DD` form, `None` for the default expiry
    #[validate(regex(
        path = *EXPIRY_DATE_PATTERN,
        message = "The expires at field must match the format YYYY-MM-DD."
    ))]
    pub expires_at: Option<String>,
}

/// Validated token details ready for issuance
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDetails {
    pub name: String,
    /// `None` when the caller left the expiry to the default policy
    pub expires_at: Option<NaiveDate>,
}

impl IssueTokenRequest {
    pub fn new(
        owner: UserLookup,
        name: Option<String>,
        expires_at: Option<String>,
    ) -> Self {
        Self {
            owner,
            name,
            expires_at,
        }
    }

    /// Validate all fields, returning every violation in field order
    ///
    /// A blank name counts as missing.
    pub fn validated(&self) -> Result<TokenDetails, Vec<String>> {
        let normalized = Self {
            name: self.name.clone().filter(|name| !name.trim().is_empty()),
            ..self.clone()
        };
        let mut messages = Vec::new();
        let mut expiry_format_ok = true;

        if let Err(errors) = normalized.validate() {
            let fields = errors.field_errors();

            for field in [NAME_FIELD, EXPIRES_AT_FIELD] {
                if let Some(field_errors) = fields.get(field) {
                    if field == EXPIRES_AT_FIELD {
                        expiry_format_ok = false;
                    }
                    messages.extend(field_errors.iter().map(describe));
                }
            }
        }

        let expires_at = match self.expires_at.as_deref() {
            Some(raw) if expiry_format_ok => {
                let parsed = parse_expiry_date(raw);
                if parsed.is_none() {
                    messages.push("The expires at field must be a valid date.".to_string());
                }
                parsed
            }
            _ => None,
        };

        if !messages.is_empty() {
            return Err(messages);
        }

        Ok(TokenDetails {
            name: normalized.name.unwrap_or_default(),
            expires_at,
        })
    }
}

fn describe(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| format!("Validation failed: {}", error.code))
}
