use std::marker::PhantomData;

use accounts_pipeline::Action;
use tracing::{debug, warn};

use super::context::ProvisioningContext;
use crate::OperationError;
use crate::operations::AccountServices;
use crate::traits::{DocumentStore, RepositoryManager};

pub struct InsertUserRecordAction<D, R> {
    _marker: PhantomData<(D, R)>,
}

impl<D, R> InsertUserRecordAction<D, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D, R> Default for InsertUserRecordAction<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> Action for InsertUserRecordAction<D, R>
where
    D: DocumentStore,
    R: RepositoryManager,
{
    type Services = AccountServices<D, R>;
    type Context = ProvisioningContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "insert_user_record"
    }

    fn forward(
        &self,
        services: &Self::Services,
        ctx: &mut ProvisioningContext,
    ) -> Result<(), Self::Error> {
        services.store().insert_user(ctx.user())?;
        debug!(email = %ctx.user().email, "inserted user record");
        Ok(())
    }

    fn backward(
        &self,
        services: &Self::Services,
        ctx: &mut ProvisioningContext,
    ) -> Result<(), Self::Error> {
        if !services.store().remove_user(&ctx.user().email)? {
            warn!(email = %ctx.user().email, "user record was already gone during rollback");
        }
        Ok(())
    }

    fn backward_description(&self) -> String {
        "remove inserted user record".to_string()
    }
}

pub struct CreateRepositoryUserAction<D, R> {
    _marker: PhantomData<(D, R)>,
}

impl<D, R> CreateRepositoryUserAction<D, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D, R> Default for CreateRepositoryUserAction<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> Action for CreateRepositoryUserAction<D, R>
where
    D: DocumentStore,
    R: RepositoryManager,
{
    type Services = AccountServices<D, R>;
    type Context = ProvisioningContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "create_repository_user"
    }

    fn forward(
        &self,
        services: &Self::Services,
        ctx: &mut ProvisioningContext,
    ) -> Result<(), Self::Error> {
        services
            .repository()
            .create_user(&ctx.user().email)
            .map_err(OperationError::user_create)?;
        debug!(email = %ctx.user().email, "created repository manager user");
        Ok(())
    }

    /// Removing the user also drops every key registered for it.
    fn backward(
        &self,
        services: &Self::Services,
        ctx: &mut ProvisioningContext,
    ) -> Result<(), Self::Error> {
        services.repository().remove_user(&ctx.user().email)
    }

    fn backward_description(&self) -> String {
        "remove repository manager user and its keys".to_string()
    }
}

/// Registers the keys the user was created with, in order, stopping at the
/// first rejection. Partial registrations are undone by removing the
/// repository manager user.
pub struct RegisterUserKeysAction<D, R> {
    _marker: PhantomData<(D, R)>,
}

impl<D, R> RegisterUserKeysAction<D, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D, R> Default for RegisterUserKeysAction<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> Action for RegisterUserKeysAction<D, R>
where
    D: DocumentStore,
    R: RepositoryManager,
{
    type Services = AccountServices<D, R>;
    type Context = ProvisioningContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "register_user_keys"
    }

    fn forward(
        &self,
        services: &Self::Services,
        ctx: &mut ProvisioningContext,
    ) -> Result<(), Self::Error> {
        let user = ctx.user().clone();
        for key in &user.keys {
            services
                .repository()
                .add_key(&user.email, key)
                .map_err(OperationError::key_add)?;
            debug!(email = %user.email, key = %key.name, "registered key with repository manager");
            ctx.record_registered_key();
        }
        Ok(())
    }
}
