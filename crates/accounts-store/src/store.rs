use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use accounts_core::{Application, Team, User};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collections {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    apps: Vec<Application>,
}

/// Clones share one in-process lock. Writers additionally hold an exclusive
/// lock on `<path>.lock`, so separate handles and separate processes are
/// serialized as well.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl JsonStore {
    /// A store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn find_user(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .into_iter()
            .find(|u| u.email == email))
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.read()?.users)
    }

    /// # Errors
    ///
    /// Returns `StoreError::DuplicateUser` if the email is taken, or an I/O
    /// error.
    pub fn insert_user(&self, user: &User) -> Result<()> {
        self.write(|collections| {
            if collections.users.iter().any(|u| u.email == user.email) {
                return Err(StoreError::DuplicateUser {
                    email: user.email.clone(),
                });
            }
            collections.users.push(user.clone());
            Ok(())
        })?;
        debug!(email = %user.email, "inserted user record");
        Ok(())
    }

    /// Replace the record with the same email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserMissing` if there is no such record, or an
    /// I/O error.
    pub fn update_user(&self, user: &User) -> Result<()> {
        self.write(|collections| {
            let Some(existing) = collections.users.iter_mut().find(|u| u.email == user.email)
            else {
                return Err(StoreError::UserMissing {
                    email: user.email.clone(),
                });
            };
            *existing = user.clone();
            Ok(())
        })?;
        debug!(email = %user.email, keys = user.keys.len(), "updated user record");
        Ok(())
    }

    /// Remove the record for `email`. Returns whether a record was removed;
    /// removing an absent record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn remove_user(&self, email: &str) -> Result<bool> {
        let removed = self.write(|collections| {
            let before = collections.users.len();
            collections.users.retain(|u| u.email != email);
            Ok(collections.users.len() != before)
        })?;
        if removed {
            debug!(email, "removed user record");
        }
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn teams_with_member(&self, email: &str) -> Result<Vec<Team>> {
        Ok(self
            .read()?
            .teams
            .into_iter()
            .filter(|t| t.has_member(email))
            .collect())
    }

    /// Names of the applications owned by any of `team_names`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn app_names_for_teams(&self, team_names: &[String]) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .apps
            .into_iter()
            .filter(|a| a.is_owned_by_any(team_names))
            .map(|a| a.name)
            .collect())
    }

    /// Insert or replace a team by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn save_team(&self, team: &Team) -> Result<()> {
        self.write(|collections| {
            collections.teams.retain(|t| t.name != team.name);
            collections.teams.push(team.clone());
            Ok(())
        })
    }

    /// Insert or replace an application by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn save_app(&self, app: &Application) -> Result<()> {
        self.write(|collections| {
            collections.apps.retain(|a| a.name != app.name);
            collections.apps.push(app.clone());
            Ok(())
        })
    }

    fn load(&self) -> Result<Collections> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Collections::default()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn read(&self) -> Result<Collections> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        self.load()
    }

    /// Load, apply `change` and save while holding both locks. Nothing is
    /// written if `change` fails.
    fn write<T>(&self, change: impl FnOnce(&mut Collections) -> Result<T>) -> Result<T> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let _file_lock = self.lock_file()?;

        let mut collections = self.load()?;
        let outcome = change(&mut collections)?;
        self.save(&collections)?;
        Ok(outcome)
    }

    fn lock_file(&self) -> Result<File> {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".lock");
        let lock_path = PathBuf::from(name);
        let lock_error = |source| StoreError::Lock {
            path: lock_path.clone(),
            source,
        };

        fs::create_dir_all(self.dir()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(lock_error)?;
        file.lock().map_err(lock_error)?;
        Ok(file)
    }

    fn save(&self, collections: &Collections) -> Result<()> {
        let content =
            serde_json::to_string_pretty(collections).map_err(StoreError::Serialize)?;
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut staging = NamedTempFile::new_in(self.dir()).map_err(write_error)?;
        staging
            .write_all(content.as_bytes())
            .map_err(write_error)?;
        staging
            .persist(&self.path)
            .map_err(|e| write_error(e.error))?;
        Ok(())
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }
}
