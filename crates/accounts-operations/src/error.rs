use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] accounts_core::AccountError),

    #[error(transparent)]
    Store(#[from] accounts_store::StoreError),

    #[error(transparent)]
    Repository(#[from] accounts_repository::RepositoryError),

    #[error("user not found: {email}")]
    UserNotFound { email: String },

    #[error("user already has this key")]
    KeyAlreadyExists,

    #[error("key not found")]
    KeyNotFound,

    #[error("key content cannot be empty")]
    EmptyKeyContent,

    #[error("key content must be a single line")]
    MultiLineKeyContent,

    #[error("failed to add key to git server")]
    RepositoryKeyAdd(#[source] Box<OperationError>),

    #[error("failed to remove the key from git server")]
    RepositoryKeyRemove(#[source] Box<OperationError>),

    #[error("failed to create user in git server")]
    RepositoryUserCreate(#[source] Box<OperationError>),
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl OperationError {
    pub(crate) fn key_add(source: Self) -> Self {
        Self::RepositoryKeyAdd(Box::new(source))
    }

    pub(crate) fn key_remove(source: Self) -> Self {
        Self::RepositoryKeyRemove(Box::new(source))
    }

    pub(crate) fn user_create(source: Self) -> Self {
        Self::RepositoryUserCreate(Box::new(source))
    }
}
