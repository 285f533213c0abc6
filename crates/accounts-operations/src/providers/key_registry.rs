use std::path::PathBuf;

use accounts_core::Key;
use accounts_repository::{KeyRegistry, RepositoryKey};
use indexmap::IndexMap;

use crate::Result;
use crate::traits::RepositoryManager;

pub struct FileSystemRepositoryManager {
    registry: KeyRegistry,
}

impl FileSystemRepositoryManager {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            registry: KeyRegistry::new(root),
        }
    }
}

fn to_repository_key(key: &Key) -> RepositoryKey {
    RepositoryKey {
        name: key.name.clone(),
        body: key.content.clone(),
    }
}

impl RepositoryManager for FileSystemRepositoryManager {
    fn create_user(&self, email: &str) -> Result<()> {
        Ok(self.registry.create_user(email)?)
    }

    fn remove_user(&self, email: &str) -> Result<()> {
        Ok(self.registry.remove_user(email)?)
    }

    fn add_key(&self, email: &str, key: &Key) -> Result<()> {
        Ok(self.registry.add_key(email, &to_repository_key(key))?)
    }

    fn remove_key(&self, email: &str, key: &Key) -> Result<()> {
        Ok(self.registry.remove_key(email, &to_repository_key(key))?)
    }

    fn list_keys(&self, email: &str) -> Result<IndexMap<String, String>> {
        Ok(self
            .registry
            .list_keys(email)?
            .into_iter()
            .map(|k| (k.name, k.body))
            .collect())
    }
}
