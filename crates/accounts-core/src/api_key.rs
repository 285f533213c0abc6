use chrono::{SecondsFormat, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::{AccountError, Result};

/// Derive a fresh opaque API token for `email`.
///
/// The token is the hex SHA-256 of the email, 32 random bytes and the
/// current time with nanosecond precision. Collisions are not checked.
///
/// # Errors
///
/// Returns `AccountError::Entropy` if the OS random source fails.
pub fn generate_api_key(email: &str) -> Result<String> {
    let mut random = [0_u8; 32];
    OsRng
        .try_fill_bytes(&mut random)
        .map_err(AccountError::Entropy)?;

    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(random);
    hasher.update(
        Utc::now()
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );
    Ok(hex::encode(hasher.finalize()))
}
