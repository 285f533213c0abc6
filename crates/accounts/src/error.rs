use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error")]
    Config(#[from] accounts_config::ConfigError),

    #[error(transparent)]
    Operation(#[from] accounts_operations::OperationError),

    #[error(transparent)]
    Account(#[from] accounts_core::AccountError),

    #[error("key registry error")]
    Repository(#[from] accounts_repository::RepositoryError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("no key given; pass the key or --file")]
    MissingKey,

    #[error("operation cancelled by user")]
    Cancelled,

    #[error("deleting '{email}' needs confirmation; pass --yes when not running in a terminal")]
    ConfirmationRequired { email: String },

    #[error("user '{email}' was only partly deleted; see the log for details")]
    IncompleteDeletion { email: String },
}

pub type Result<T> = std::result::Result<T, CliError>;
