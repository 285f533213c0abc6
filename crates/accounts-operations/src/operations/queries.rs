use accounts_core::{Team, User, generate_api_key, team_names, validate_email};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::Result;
use crate::error::OperationError;
use crate::operations::AccountServices;
use crate::traits::{DocumentStore, RepositoryManager};

/// Lookups and single-store updates that need no coordination between the
/// two stores.
pub struct AccountQueries<D, R> {
    services: AccountServices<D, R>,
    admin_team: Option<String>,
}

impl<D, R> AccountQueries<D, R>
where
    D: DocumentStore,
    R: RepositoryManager,
{
    pub fn new(services: AccountServices<D, R>, admin_team: Option<String>) -> Self {
        Self {
            services,
            admin_team,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the document store cannot be read.
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.services.store().list_users()
    }

    /// # Errors
    ///
    /// Returns a validation error for a malformed email, or
    /// `OperationError::UserNotFound` if no record exists.
    pub fn get_user_by_email(&self, email: &str) -> Result<User> {
        validate_email(email)?;
        self.services
            .store()
            .find_user(email)?
            .ok_or_else(|| OperationError::UserNotFound {
                email: email.to_string(),
            })
    }

    /// Replace the stored record of `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or cannot be written.
    pub fn update(&self, user: &User) -> Result<()> {
        self.services.store().update_user(user)?;
        debug!(email = %user.email, "updated user");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the document store cannot be read.
    pub fn teams(&self, user: &User) -> Result<Vec<Team>> {
        self.services.store().teams_with_member(&user.email)
    }

    /// Whether `user` belongs to the configured admin team. Without an
    /// admin team, or when teams cannot be looked up, nobody is an admin.
    pub fn is_admin(&self, user: &User) -> bool {
        let Some(admin_team) = self.admin_team.as_deref() else {
            return false;
        };
        match self.teams(user) {
            Ok(teams) => teams.iter().any(|t| t.name == admin_team),
            Err(e) => {
                warn!(
                    email = %user.email,
                    error = %e,
                    "team lookup failed; treating user as non-admin"
                );
                false
            }
        }
    }

    /// Names of the applications owned by any of the user's teams.
    ///
    /// # Errors
    ///
    /// Returns an error if the document store cannot be read.
    pub fn allowed_apps(&self, user: &User) -> Result<Vec<String>> {
        let teams = self.teams(user)?;
        self.services
            .store()
            .app_names_for_teams(&team_names(&teams))
    }

    /// Keys the repository manager has registered for `user`, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository manager does not know the user or
    /// is unreachable.
    pub fn list_keys(&self, user: &User) -> Result<IndexMap<String, String>> {
        self.services.repository().list_keys(&user.email)
    }

    /// The user's API key, generating and persisting one first if the user
    /// has none.
    ///
    /// # Errors
    ///
    /// Returns an error if a new key cannot be generated or persisted.
    pub fn show_api_key(&self, user: &mut User) -> Result<String> {
        match user.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => self.regenerate_api_key(user),
        }
    }

    /// Replace the user's API key with a fresh one and persist it. `user`
    /// keeps its old key if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the system random source fails or the record
    /// cannot be written.
    pub fn regenerate_api_key(&self, user: &mut User) -> Result<String> {
        let token = generate_api_key(&user.email)?;
        let mut next = user.clone();
        next.api_key = Some(token.clone());
        self.services.store().update_user(&next)?;
        info!(email = %user.email, "regenerated API key");
        *user = next;
        Ok(token)
    }
}
