use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error at '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("user '{email}' is not registered")]
    UnknownUser { email: String },

    #[error("key '{name}' is already registered")]
    KeyExists { name: String },

    #[error("key '{name}' must have a single-line, non-empty body")]
    InvalidKeyBody { name: String },

    #[error("key '{name}' is not registered")]
    KeyMissing { name: String },

    #[error("'{name}' cannot be used as a registry name")]
    InvalidName { name: String },
}
