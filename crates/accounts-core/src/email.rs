use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AccountError, Result};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@(?:[-a-z0-9]+\.)+[a-z]{2,}$").expect("email pattern compiles")
});

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// # Errors
///
/// Returns `AccountError::InvalidEmail` if `email` is not a valid address.
pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AccountError::InvalidEmail {
            email: email.to_string(),
        })
    }
}
