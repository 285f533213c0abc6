use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "accounts.toml";
pub const DEFAULT_STORE_FILE: &str = "accounts.json";
pub const DEFAULT_REPOSITORY_ROOT: &str = "repositories";
pub const CONFIG_ENV_VAR: &str = "ACCOUNTS_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    admin_team: Option<String>,
    #[serde(default)]
    quota: QuotaSection,
    #[serde(default)]
    store: StoreSection,
    #[serde(default)]
    repository: RepositorySection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct QuotaSection {
    apps_per_user: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreSection {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RepositorySection {
    root: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AccountsConfig {
    admin_team: Option<String>,
    apps_per_user: Option<i64>,
    store_path: PathBuf,
    repository_root: PathBuf,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            admin_team: None,
            apps_per_user: None,
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            repository_root: PathBuf::from(DEFAULT_REPOSITORY_ROOT),
        }
    }
}

impl AccountsConfig {
    /// Load the configuration at `path`, falling back to defaults when the
    /// file does not exist. Relative paths inside the file are resolved
    /// against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

        Self::from_toml_str(&content, base_dir).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not a valid configuration.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(Self {
            admin_team: file.admin_team.filter(|t| !t.is_empty()),
            apps_per_user: file.quota.apps_per_user,
            store_path: base_dir.join(file.store.path.unwrap_or(defaults.store_path)),
            repository_root: base_dir.join(file.repository.root.unwrap_or(defaults.repository_root)),
        })
    }

    #[must_use]
    pub fn admin_team(&self) -> Option<&str> {
        self.admin_team.as_deref()
    }

    /// Configured `quota.apps-per-user`, if any.
    #[must_use]
    pub fn apps_per_user(&self) -> Option<i64> {
        self.apps_per_user
    }

    #[must_use]
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    #[must_use]
    pub fn repository_root(&self) -> &Path {
        &self.repository_root
    }

    #[must_use]
    pub fn with_admin_team(mut self, team: impl Into<String>) -> Self {
        self.admin_team = Some(team.into());
        self
    }

    #[must_use]
    pub fn with_apps_per_user(mut self, limit: i64) -> Self {
        self.apps_per_user = Some(limit);
        self
    }

    #[must_use]
    pub fn with_store_path(mut self, path: PathBuf) -> Self {
        self.store_path = path;
        self
    }

    #[must_use]
    pub fn with_repository_root(mut self, root: PathBuf) -> Self {
        self.repository_root = root;
        self
    }
}
