use std::marker::PhantomData;

use accounts_pipeline::Action;
use tracing::debug;

use super::context::KeyContext;
use crate::OperationError;
use crate::operations::AccountServices;
use crate::traits::{DocumentStore, RepositoryManager};

pub struct RegisterKeyAction<D, R> {
    _marker: PhantomData<(D, R)>,
}

impl<D, R> RegisterKeyAction<D, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D, R> Default for RegisterKeyAction<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> Action for RegisterKeyAction<D, R>
where
    D: DocumentStore,
    R: RepositoryManager,
{
    type Services = AccountServices<D, R>;
    type Context = KeyContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "register_key"
    }

    fn forward(&self, services: &Self::Services, ctx: &mut KeyContext) -> Result<(), Self::Error> {
        services
            .repository()
            .add_key(&ctx.user().email, ctx.key())
            .map_err(OperationError::key_add)?;
        debug!(
            email = %ctx.user().email,
            key = %ctx.key().name,
            "registered key with repository manager"
        );
        Ok(())
    }

    fn backward(&self, services: &Self::Services, ctx: &mut KeyContext) -> Result<(), Self::Error> {
        services
            .repository()
            .remove_key(&ctx.user().email, ctx.key())
            .map_err(OperationError::key_remove)
    }

    fn backward_description(&self) -> String {
        "deregister key from repository manager".to_string()
    }
}

pub struct DeregisterKeyAction<D, R> {
    _marker: PhantomData<(D, R)>,
}

impl<D, R> DeregisterKeyAction<D, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D, R> Default for DeregisterKeyAction<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> Action for DeregisterKeyAction<D, R>
where
    D: DocumentStore,
    R: RepositoryManager,
{
    type Services = AccountServices<D, R>;
    type Context = KeyContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "deregister_key"
    }

    fn forward(&self, services: &Self::Services, ctx: &mut KeyContext) -> Result<(), Self::Error> {
        services
            .repository()
            .remove_key(&ctx.user().email, ctx.key())
            .map_err(OperationError::key_remove)?;
        debug!(
            email = %ctx.user().email,
            key = %ctx.key().name,
            "deregistered key from repository manager"
        );
        Ok(())
    }

    fn backward(&self, services: &Self::Services, ctx: &mut KeyContext) -> Result<(), Self::Error> {
        services
            .repository()
            .add_key(&ctx.user().email, ctx.key())
            .map_err(OperationError::key_add)
    }

    fn backward_description(&self) -> String {
        "register key with repository manager again".to_string()
    }
}

/// Writes the precomputed key list. Always the last action, so it has
/// nothing to undo.
pub struct PersistKeysAction<D, R> {
    _marker: PhantomData<(D, R)>,
}

impl<D, R> PersistKeysAction<D, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D, R> Default for PersistKeysAction<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> Action for PersistKeysAction<D, R>
where
    D: DocumentStore,
    R: RepositoryManager,
{
    type Services = AccountServices<D, R>;
    type Context = KeyContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "persist_keys"
    }

    fn forward(&self, services: &Self::Services, ctx: &mut KeyContext) -> Result<(), Self::Error> {
        let next = ctx.next_user();
        services.store().update_user(&next)?;
        debug!(email = %next.email, keys = next.keys.len(), "persisted key list");
        ctx.commit(next);
        Ok(())
    }
}
