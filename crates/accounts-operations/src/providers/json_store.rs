use std::path::PathBuf;

use accounts_core::{Team, User};
use accounts_store::JsonStore;

use crate::Result;
use crate::traits::DocumentStore;

pub struct JsonDocumentStore {
    store: JsonStore,
}

impl JsonDocumentStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::open(path),
        }
    }
}

impl DocumentStore for JsonDocumentStore {
    fn find_user(&self, email: &str) -> Result<Option<User>> {
        Ok(self.store.find_user(email)?)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.store.list_users()?)
    }

    fn insert_user(&self, user: &User) -> Result<()> {
        Ok(self.store.insert_user(user)?)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        Ok(self.store.update_user(user)?)
    }

    fn remove_user(&self, email: &str) -> Result<bool> {
        Ok(self.store.remove_user(email)?)
    }

    fn teams_with_member(&self, email: &str) -> Result<Vec<Team>> {
        Ok(self.store.teams_with_member(email)?)
    }

    fn app_names_for_teams(&self, team_names: &[String]) -> Result<Vec<String>> {
        Ok(self.store.app_names_for_teams(team_names)?)
    }
}
