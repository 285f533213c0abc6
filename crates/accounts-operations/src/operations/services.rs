use std::sync::Arc;

use crate::traits::{DocumentStore, RepositoryManager};

/// The two collaborators every account operation works against.
pub struct AccountServices<D, R> {
    store: Arc<D>,
    repository: Arc<R>,
}

impl<D, R> Clone for AccountServices<D, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<D, R> AccountServices<D, R>
where
    D: DocumentStore,
    R: RepositoryManager,
{
    pub fn new(store: Arc<D>, repository: Arc<R>) -> Self {
        Self { store, repository }
    }

    #[must_use]
    pub fn store(&self) -> &D {
        &self.store
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }
}
