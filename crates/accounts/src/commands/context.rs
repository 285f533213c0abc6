use std::sync::Arc;

use accounts_config::AccountsConfig;
use accounts_operations::operations::{
    AccountQueries, AccountServices, KeyOperation, ProvisioningOperation,
};
use accounts_operations::providers::{FileSystemRepositoryManager, JsonDocumentStore};
use accounts_repository::KeyRegistry;
use tracing::debug;

type Services = AccountServices<JsonDocumentStore, FileSystemRepositoryManager>;

/// The configured stores, wired into the account operations.
pub(crate) struct Accounts {
    config: AccountsConfig,
    services: Services,
}

impl Accounts {
    pub(crate) fn new(config: &AccountsConfig) -> Self {
        debug!(
            store = %config.store_path().display(),
            repository = %config.repository_root().display(),
            "opening account stores"
        );
        let services = AccountServices::new(
            Arc::new(JsonDocumentStore::new(config.store_path())),
            Arc::new(FileSystemRepositoryManager::new(config.repository_root())),
        );
        Self {
            config: config.clone(),
            services,
        }
    }

    pub(crate) fn provisioning(
        &self,
    ) -> ProvisioningOperation<JsonDocumentStore, FileSystemRepositoryManager> {
        ProvisioningOperation::new(self.services.clone(), self.config.apps_per_user())
    }

    pub(crate) fn keys(&self) -> KeyOperation<JsonDocumentStore, FileSystemRepositoryManager> {
        KeyOperation::new(self.services.clone())
    }

    pub(crate) fn queries(&self) -> AccountQueries<JsonDocumentStore, FileSystemRepositoryManager> {
        AccountQueries::new(
            self.services.clone(),
            self.config.admin_team().map(str::to_string),
        )
    }

    pub(crate) fn registry(&self) -> KeyRegistry {
        KeyRegistry::new(self.config.repository_root())
    }
}
