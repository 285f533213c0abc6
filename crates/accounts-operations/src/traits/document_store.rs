use accounts_core::{Team, User};

use crate::Result;

/// Storage for user, team and application records.
///
/// Only single-record writes are atomic; there are no multi-record
/// transactions.
pub trait DocumentStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn find_user(&self, email: &str) -> Result<Option<User>>;

    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn list_users(&self) -> Result<Vec<User>>;

    /// # Errors
    ///
    /// Returns an error if a user with the same email exists or the store
    /// cannot be reached.
    fn insert_user(&self, user: &User) -> Result<()>;

    /// Replace the whole record with the same email.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or the store cannot be
    /// reached.
    fn update_user(&self, user: &User) -> Result<()>;

    /// Returns whether a record was removed. Removing an absent record is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn remove_user(&self, email: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn teams_with_member(&self, email: &str) -> Result<Vec<Team>>;

    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn app_names_for_teams(&self, team_names: &[String]) -> Result<Vec<String>>;
}
