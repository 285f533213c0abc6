use accounts_core::{Key, User};
use accounts_pipeline::{Pipeline, PipelineBuilder};
use tracing::info;

use super::actions::{DeregisterKeyAction, PersistKeysAction, RegisterKeyAction};
use super::content::checked_key;
use super::context::KeyContext;
use crate::Result;
use crate::error::OperationError;
use crate::operations::{AccountServices, run_pipeline};
use crate::traits::{DocumentStore, RepositoryManager};

type KeyPipeline<D, R> = Pipeline<AccountServices<D, R>, KeyContext, OperationError>;

/// Adds and removes keys on both the repository manager and the user record.
pub struct KeyOperation<D, R> {
    services: AccountServices<D, R>,
}

impl<D, R> KeyOperation<D, R>
where
    D: DocumentStore + 'static,
    R: RepositoryManager + 'static,
{
    pub fn new(services: AccountServices<D, R>) -> Self {
        Self { services }
    }

    /// Register `key` with the repository manager, then persist it in the
    /// user record. If persisting fails the registration is undone.
    ///
    /// The content is trimmed first. A key without a name gets the first free
    /// `<email>-<n>` name. `user` is only updated once both stores accepted
    /// the key. Returns the key as stored.
    ///
    /// # Errors
    ///
    /// Returns `EmptyKeyContent` or `MultiLineKeyContent` for unusable
    /// content, `OperationError::KeyAlreadyExists` if the user has a key with
    /// the same name or content, `RepositoryKeyAdd` if the repository manager
    /// rejects the key, or the store error if persisting fails.
    pub fn add_key(&self, user: &mut User, key: Key) -> Result<Key> {
        let key = checked_key(key)?;
        if user.has_key(&key) {
            return Err(OperationError::KeyAlreadyExists);
        }

        let key = if key.name.is_empty() {
            Key::new(user.next_key_name(), key.content)
        } else {
            key
        };
        let next_keys = user.keys_with(key.clone());
        let mut ctx = KeyContext::new(user.clone(), key, next_keys);

        run_pipeline(
            &Self::add_pipeline(),
            &self.services,
            &mut ctx,
            "add_key",
            &user.email,
        )?;

        let (updated, key) = ctx.into_parts();
        info!(email = %updated.email, key = %key.name, "added key");
        *user = updated;
        Ok(key)
    }

    /// Deregister the key matching `key` by name or content, then persist
    /// the shortened key list. If persisting fails the key is registered
    /// again. Remaining keys keep their order.
    ///
    /// Returns the removed key.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::KeyNotFound` if the user has no matching key,
    /// `RepositoryKeyRemove` if the repository manager refuses, or the store
    /// error if persisting fails.
    pub fn remove_key(&self, user: &mut User, key: &Key) -> Result<Key> {
        let Some((index, stored)) = user.find_key(&key.clone().trimmed()) else {
            return Err(OperationError::KeyNotFound);
        };
        let stored = stored.clone();
        let next_keys = user.keys_without(index);
        let mut ctx = KeyContext::new(user.clone(), stored, next_keys);

        run_pipeline(
            &Self::remove_pipeline(),
            &self.services,
            &mut ctx,
            "remove_key",
            &user.email,
        )?;

        let (updated, key) = ctx.into_parts();
        info!(email = %updated.email, key = %key.name, "removed key");
        *user = updated;
        Ok(key)
    }

    fn add_pipeline() -> KeyPipeline<D, R> {
        PipelineBuilder::new()
            .first(RegisterKeyAction::<D, R>::new())
            .then(PersistKeysAction::<D, R>::new())
            .build()
    }

    fn remove_pipeline() -> KeyPipeline<D, R> {
        PipelineBuilder::new()
            .first(DeregisterKeyAction::<D, R>::new())
            .then(PersistKeysAction::<D, R>::new())
            .build()
    }
}
