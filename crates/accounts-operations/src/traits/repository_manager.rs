use accounts_core::Key;
use indexmap::IndexMap;

use crate::Result;

/// The service authorizing git access by public key.
///
/// It keeps its own registration of users and keys, which the account
/// operations mirror from the document store.
pub trait RepositoryManager: Send + Sync {
    /// Register a user. Registering an existing user succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the user or is unreachable.
    fn create_user(&self, email: &str) -> Result<()>;

    /// Drop a user together with its keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the request or is unreachable.
    fn remove_user(&self, email: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the key is rejected or the service is unreachable.
    fn add_key(&self, email: &str, key: &Key) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the key is unknown or the service is unreachable.
    fn remove_key(&self, email: &str, key: &Key) -> Result<()>;

    /// Registered keys of a user, key name to key content.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is unknown or the service is unreachable.
    fn list_keys(&self, email: &str) -> Result<IndexMap<String, String>>;
}
