use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use accounts_core::{Application, Key, Team, User};
use accounts_repository::RepositoryError;
use accounts_store::StoreError;
use indexmap::IndexMap;

use crate::Result;
use crate::operations::AccountServices;
use crate::traits::{DocumentStore, RepositoryManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCall {
    Find,
    Insert,
    Update,
    Remove,
    Teams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryCall {
    CreateUser,
    RemoveUser,
    AddKey,
    RemoveKey,
    ListKeys,
}

fn unreachable_store(write: bool) -> StoreError {
    let path = PathBuf::from("/mock/accounts.json");
    let source = io::Error::new(io::ErrorKind::ConnectionRefused, "store unreachable");
    if write {
        StoreError::Write { path, source }
    } else {
        StoreError::Read { path, source }
    }
}

fn unreachable_repository() -> RepositoryError {
    RepositoryError::Io {
        path: PathBuf::from("/mock/repositories"),
        source: io::Error::new(io::ErrorKind::ConnectionRefused, "network unreachable"),
    }
}

pub struct MockDocumentStore {
    users: Mutex<Vec<User>>,
    teams: Vec<Team>,
    apps: Vec<Application>,
    failing: Mutex<HashSet<StoreCall>>,
}

impl MockDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            teams: Vec::new(),
            apps: Vec::new(),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        self.users.lock().expect("lock poisoned").push(user);
        self
    }

    #[must_use]
    pub fn with_team(mut self, name: &str, members: &[&str]) -> Self {
        self.teams.push(Team {
            name: name.to_string(),
            users: members.iter().map(ToString::to_string).collect(),
        });
        self
    }

    #[must_use]
    pub fn with_app(mut self, name: &str, teams: &[&str]) -> Self {
        self.apps.push(Application {
            name: name.to_string(),
            teams: teams.iter().map(ToString::to_string).collect(),
        });
        self
    }

    #[must_use]
    pub fn failing_on(self, call: StoreCall) -> Self {
        self.fail_on(call);
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_on(&self, call: StoreCall) {
        self.failing.lock().expect("lock poisoned").insert(call);
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn user(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    fn check(&self, call: StoreCall) -> Result<()> {
        if self.failing.lock().expect("lock poisoned").contains(&call) {
            let write = matches!(call, StoreCall::Insert | StoreCall::Update | StoreCall::Remove);
            return Err(unreachable_store(write).into());
        }
        Ok(())
    }
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MockDocumentStore {
    fn find_user(&self, email: &str) -> Result<Option<User>> {
        self.check(StoreCall::Find)?;
        Ok(self.user(email))
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.check(StoreCall::Find)?;
        Ok(self.users.lock().expect("lock poisoned").clone())
    }

    fn insert_user(&self, user: &User) -> Result<()> {
        self.check(StoreCall::Insert)?;
        let mut users = self.users.lock().expect("lock poisoned");
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateUser {
                email: user.email.clone(),
            }
            .into());
        }
        users.push(user.clone());
        Ok(())
    }

    fn update_user(&self, user: &User) -> Result<()> {
        self.check(StoreCall::Update)?;
        let mut users = self.users.lock().expect("lock poisoned");
        let Some(existing) = users.iter_mut().find(|u| u.email == user.email) else {
            return Err(StoreError::UserMissing {
                email: user.email.clone(),
            }
            .into());
        };
        *existing = user.clone();
        Ok(())
    }

    fn remove_user(&self, email: &str) -> Result<bool> {
        self.check(StoreCall::Remove)?;
        let mut users = self.users.lock().expect("lock poisoned");
        let before = users.len();
        users.retain(|u| u.email != email);
        Ok(users.len() != before)
    }

    fn teams_with_member(&self, email: &str) -> Result<Vec<Team>> {
        self.check(StoreCall::Teams)?;
        Ok(self
            .teams
            .iter()
            .filter(|t| t.has_member(email))
            .cloned()
            .collect())
    }

    fn app_names_for_teams(&self, team_names: &[String]) -> Result<Vec<String>> {
        self.check(StoreCall::Find)?;
        Ok(self
            .apps
            .iter()
            .filter(|a| a.is_owned_by_any(team_names))
            .map(|a| a.name.clone())
            .collect())
    }
}

pub struct MockRepositoryManager {
    users: Mutex<IndexMap<String, IndexMap<String, String>>>,
    failing: Mutex<HashSet<RepositoryCall>>,
    rejected_content: Option<String>,
}

impl MockRepositoryManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Mutex::new(IndexMap::new()),
            failing: Mutex::new(HashSet::new()),
            rejected_content: None,
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_user(self, email: &str) -> Self {
        self.users
            .lock()
            .expect("lock poisoned")
            .insert(email.to_string(), IndexMap::new());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_key(self, email: &str, key: &Key) -> Self {
        self.users
            .lock()
            .expect("lock poisoned")
            .entry(email.to_string())
            .or_default()
            .insert(key.name.clone(), key.content.clone());
        self
    }

    #[must_use]
    pub fn failing_on(self, call: RepositoryCall) -> Self {
        self.fail_on(call);
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_on(&self, call: RepositoryCall) {
        self.failing.lock().expect("lock poisoned").insert(call);
    }

    /// Make `add_key` fail only for keys with this content.
    #[must_use]
    pub fn rejecting_key(mut self, content: &str) -> Self {
        self.rejected_content = Some(content.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn has_user(&self, email: &str) -> bool {
        self.users.lock().expect("lock poisoned").contains_key(email)
    }

    /// Registered keys of `email` as `(name, content)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn keys(&self, email: &str) -> Vec<(String, String)> {
        self.users
            .lock()
            .expect("lock poisoned")
            .get(email)
            .map(|keys| {
                keys.iter()
                    .map(|(n, c)| (n.clone(), c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn check(&self, call: RepositoryCall) -> Result<()> {
        if self.failing.lock().expect("lock poisoned").contains(&call) {
            return Err(unreachable_repository().into());
        }
        Ok(())
    }
}

impl Default for MockRepositoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryManager for MockRepositoryManager {
    fn create_user(&self, email: &str) -> Result<()> {
        self.check(RepositoryCall::CreateUser)?;
        self.users
            .lock()
            .expect("lock poisoned")
            .entry(email.to_string())
            .or_default();
        Ok(())
    }

    fn remove_user(&self, email: &str) -> Result<()> {
        self.check(RepositoryCall::RemoveUser)?;
        match self.users.lock().expect("lock poisoned").shift_remove(email) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::UnknownUser {
                email: email.to_string(),
            }
            .into()),
        }
    }

    fn add_key(&self, email: &str, key: &Key) -> Result<()> {
        self.check(RepositoryCall::AddKey)?;
        if self.rejected_content.as_deref() == Some(key.content.as_str()) {
            return Err(unreachable_repository().into());
        }
        let mut users = self.users.lock().expect("lock poisoned");
        let Some(keys) = users.get_mut(email) else {
            return Err(RepositoryError::UnknownUser {
                email: email.to_string(),
            }
            .into());
        };
        if keys.contains_key(&key.name) || keys.values().any(|c| c == &key.content) {
            return Err(RepositoryError::KeyExists {
                name: key.name.clone(),
            }
            .into());
        }
        keys.insert(key.name.clone(), key.content.clone());
        Ok(())
    }

    fn remove_key(&self, email: &str, key: &Key) -> Result<()> {
        self.check(RepositoryCall::RemoveKey)?;
        let mut users = self.users.lock().expect("lock poisoned");
        let removed = users
            .get_mut(email)
            .and_then(|keys| keys.shift_remove(&key.name));
        match removed {
            Some(_) => Ok(()),
            None => Err(RepositoryError::KeyMissing {
                name: key.name.clone(),
            }
            .into()),
        }
    }

    fn list_keys(&self, email: &str) -> Result<IndexMap<String, String>> {
        self.check(RepositoryCall::ListKeys)?;
        self.users
            .lock()
            .expect("lock poisoned")
            .get(email)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::UnknownUser {
                    email: email.to_string(),
                }
                .into()
            })
    }
}

pub type MockServices = AccountServices<MockDocumentStore, MockRepositoryManager>;

/// Services over the given mocks, keeping handles for assertions.
pub fn services(
    store: MockDocumentStore,
    repository: MockRepositoryManager,
) -> (MockServices, Arc<MockDocumentStore>, Arc<MockRepositoryManager>) {
    let store = Arc::new(store);
    let repository = Arc::new(repository);
    (
        AccountServices::new(Arc::clone(&store), Arc::clone(&repository)),
        store,
        repository,
    )
}

/// # Panics
///
/// Panics if `email` is not a valid address.
#[must_use]
pub fn make_user(email: &str) -> User {
    User::new(email).expect("valid email")
}
