use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid email: '{email}'")]
    InvalidEmail { email: String },

    #[error("failed to gather randomness for API key")]
    Entropy(#[source] rand::Error),
}

pub type Result<T> = std::result::Result<T, AccountError>;
