use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::RepositoryError;

type Result<T> = std::result::Result<T, RepositoryError>;

const KEY_EXTENSION: &str = "pub";

/// A key as the registry stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryKey {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct KeyRegistry {
    root: PathBuf,
}

impl KeyRegistry {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register `email`. Registering an existing user is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unusable or the directory cannot be
    /// created.
    pub fn create_user(&self, email: &str) -> Result<()> {
        let dir = self.user_dir(email)?;
        fs::create_dir_all(&dir).map_err(|source| io_error(&dir, source))?;
        debug!(email, "registered user in key registry");
        Ok(())
    }

    /// Drop `email` and every key registered for it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownUser` if the user is not registered.
    pub fn remove_user(&self, email: &str) -> Result<()> {
        let dir = self.existing_user_dir(email)?;
        fs::remove_dir_all(&dir).map_err(|source| io_error(&dir, source))?;
        debug!(email, "removed user from key registry");
        Ok(())
    }

    /// Bodies are stored and compared without surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidKeyBody` for an empty or multi-line
    /// body, `KeyExists` if a key with the same name or body is registered
    /// for the user, or `UnknownUser` if the user is not registered.
    pub fn add_key(&self, email: &str, key: &RepositoryKey) -> Result<()> {
        let body = key.body.trim();
        if body.is_empty() || body.contains(['\r', '\n']) {
            return Err(RepositoryError::InvalidKeyBody {
                name: key.name.clone(),
            });
        }
        let dir = self.existing_user_dir(email)?;
        let path = key_path(&dir, &key.name)?;

        if path.exists() || self.list_keys(email)?.iter().any(|k| k.body == body) {
            return Err(RepositoryError::KeyExists {
                name: key.name.clone(),
            });
        }

        fs::write(&path, format!("{body}\n"))
            .map_err(|source| io_error(&path, source))?;
        debug!(email, key = %key.name, "registered key");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::KeyMissing` if no key with that name is
    /// registered for the user.
    pub fn remove_key(&self, email: &str, key: &RepositoryKey) -> Result<()> {
        let dir = self.existing_user_dir(email)?;
        let path = key_path(&dir, &key.name)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(email, key = %key.name, "deregistered key");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RepositoryError::KeyMissing {
                name: key.name.clone(),
            }),
            Err(source) => Err(io_error(&path, source)),
        }
    }

    /// Keys registered for `email`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownUser` if the user is not registered.
    pub fn list_keys(&self, email: &str) -> Result<Vec<RepositoryKey>> {
        let dir = self.existing_user_dir(email)?;
        let mut keys = Vec::new();

        for entry in fs::read_dir(&dir).map_err(|source| io_error(&dir, source))? {
            let path = entry.map_err(|source| io_error(&dir, source))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(KEY_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let body = fs::read_to_string(&path).map_err(|source| io_error(&path, source))?;
            keys.push(RepositoryKey {
                name: name.to_string(),
                body: body.trim().to_string(),
            });
        }

        keys.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(keys)
    }

    /// Emails of all registered users, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry root cannot be read.
    pub fn users(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error(&self.root, source)),
        };

        let mut users = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| io_error(&self.root, source))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    users.push(name.to_string());
                }
            }
        }
        users.sort();
        Ok(users)
    }

    /// The registry in `authorized_keys` format: one line per key, tagged
    /// with the owning user so the git frontend can authorize by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be read.
    pub fn authorized_keys(&self) -> Result<String> {
        let mut lines = Vec::new();
        for email in self.users()? {
            for key in self.list_keys(&email)? {
                if key.body.contains(['\r', '\n']) {
                    warn!(email, key = %key.name, "skipping key file with more than one line");
                    continue;
                }
                lines.push(format!(
                    "environment=\"GIT_USER={email}\",no-port-forwarding,no-X11-forwarding,no-pty {}",
                    key.body
                ));
            }
        }
        Ok(lines.join("\n"))
    }

    fn user_dir(&self, email: &str) -> Result<PathBuf> {
        check_name(email)?;
        Ok(self.root.join(email))
    }

    fn existing_user_dir(&self, email: &str) -> Result<PathBuf> {
        let dir = self.user_dir(email)?;
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(RepositoryError::UnknownUser {
                email: email.to_string(),
            })
        }
    }
}

fn key_path(user_dir: &Path, name: &str) -> Result<PathBuf> {
    check_name(name)?;
    Ok(user_dir.join(format!("{name}.{KEY_EXTENSION}")))
}

fn check_name(name: &str) -> Result<()> {
    let unusable = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if unusable {
        Err(RepositoryError::InvalidName {
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> RepositoryError {
    RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    }
}
