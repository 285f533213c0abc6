use accounts_core::{Key, Quota, User, validate_email};
use accounts_pipeline::{Pipeline, PipelineBuilder};
use tracing::{error, info, warn};

use super::actions::{CreateRepositoryUserAction, InsertUserRecordAction, RegisterUserKeysAction};
use super::context::ProvisioningContext;
use crate::Result;
use crate::error::OperationError;
use crate::operations::keys::checked_key;
use crate::operations::{AccountServices, run_pipeline};
use crate::traits::{DocumentStore, RepositoryManager};

/// What a best-effort deletion managed to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub record_removed: bool,
    pub repository_user_removed: bool,
}

impl DeleteOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.record_removed && self.repository_user_removed
    }
}

pub struct ProvisioningOperation<D, R> {
    services: AccountServices<D, R>,
    apps_per_user: Option<i64>,
}

impl<D, R> ProvisioningOperation<D, R>
where
    D: DocumentStore + 'static,
    R: RepositoryManager + 'static,
{
    /// `apps_per_user` is the configured app quota for users created
    /// without one.
    pub fn new(services: AccountServices<D, R>, apps_per_user: Option<i64>) -> Self {
        Self {
            services,
            apps_per_user,
        }
    }

    /// Create `user` in the document store and in the repository manager,
    /// together with the keys it already carries.
    ///
    /// A missing quota is resolved from the configured app limit. Keys are
    /// checked like [`KeyOperation::add_key`](crate::operations::KeyOperation::add_key)
    /// checks them, and keys without a name get a default one. If the
    /// repository manager fails, the inserted record is removed again.
    /// `user` receives the resolved values on success.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad email or an unusable or repeated
    /// key, the store error if the record cannot be inserted (for example a
    /// duplicate email), or `RepositoryUserCreate` / `RepositoryKeyAdd` if the
    /// repository manager fails.
    pub fn create(&self, user: &mut User) -> Result<()> {
        validate_email(&user.email)?;

        let mut prepared = with_checked_keys(user.clone())?;
        if prepared.quota.is_none() {
            prepared.quota = Some(Quota::for_new_user(self.apps_per_user));
        }
        let mut ctx = ProvisioningContext::new(prepared);

        run_pipeline(
            &Self::create_pipeline(),
            &self.services,
            &mut ctx,
            "create_user",
            &user.email,
        )?;

        info!(email = %user.email, keys = ctx.registered_keys(), "created user");
        *user = ctx.into_user();
        Ok(())
    }

    /// Remove the user from both stores. Each side is attempted regardless
    /// of the other; failures are logged and reflected in the outcome.
    pub fn delete(&self, user: &User) -> DeleteOutcome {
        let email = user.email.as_str();

        let record_removed = match self.services.store().remove_user(email) {
            Ok(true) => true,
            Ok(false) => {
                warn!(email, "no user record to remove");
                false
            }
            Err(e) => {
                error!(email, error = %e, "failed to remove user record");
                false
            }
        };

        let repository_user_removed = match self.services.repository().remove_user(email) {
            Ok(()) => true,
            Err(e) => {
                error!(email, error = %e, "failed to remove user from repository manager");
                false
            }
        };

        info!(email, record_removed, repository_user_removed, "deleted user");
        DeleteOutcome {
            record_removed,
            repository_user_removed,
        }
    }

    fn create_pipeline() -> Pipeline<AccountServices<D, R>, ProvisioningContext, OperationError> {
        PipelineBuilder::new()
            .first(InsertUserRecordAction::<D, R>::new())
            .then(CreateRepositoryUserAction::<D, R>::new())
            .then(RegisterUserKeysAction::<D, R>::new())
            .build()
    }
}

/// Trim and check the initial keys, reject repeats among them and name the
/// unnamed ones without taking a name given explicitly further down the list.
fn with_checked_keys(mut user: User) -> Result<User> {
    let keys = std::mem::take(&mut user.keys)
        .into_iter()
        .map(checked_key)
        .collect::<Result<Vec<_>>>()?;
    let reserved: Vec<String> = keys
        .iter()
        .filter(|k| !k.name.is_empty())
        .map(|k| k.name.clone())
        .collect();

    for key in keys {
        if user.has_key(&key) {
            return Err(OperationError::KeyAlreadyExists);
        }
        let key = if key.name.is_empty() {
            Key::new(user.next_key_name_excluding(&reserved), key.content)
        } else {
            key
        };
        user.keys.push(key);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{
        MockDocumentStore, MockRepositoryManager, RepositoryCall, StoreCall, make_user, services,
    };

    const EMAIL: &str = "a@x.com";

    mod create {
        use super::*;

        #[test]
        fn stores_record_and_registers_user() -> anyhow::Result<()> {
            let (services, store, repo) =
                services(MockDocumentStore::new(), MockRepositoryManager::new());
            let mut user = make_user(EMAIL);

            ProvisioningOperation::new(services, None).create(&mut user)?;

            assert!(store.user(EMAIL).is_some());
            assert!(repo.has_user(EMAIL));
            Ok(())
        }

        #[test]
        fn repository_failure_removes_inserted_record() {
            let (services, store, repo) = services(
                MockDocumentStore::new(),
                MockRepositoryManager::new().failing_on(RepositoryCall::CreateUser),
            );
            let mut user = make_user(EMAIL);

            let err = ProvisioningOperation::new(services, None)
                .create(&mut user)
                .expect_err("repository fails");

            assert!(matches!(err, OperationError::RepositoryUserCreate(_)));
            assert!(store.user(EMAIL).is_none());
            assert!(!repo.has_user(EMAIL));
        }

        #[test]
        fn rejected_key_undoes_user_and_earlier_keys() {
            let (services, store, repo) = services(
                MockDocumentStore::new(),
                MockRepositoryManager::new().rejecting_key("ssh-rsa BBB"),
            );
            let mut user = make_user(EMAIL).with_keys(vec![
                Key::unnamed("ssh-rsa AAA"),
                Key::unnamed("ssh-rsa BBB"),
                Key::unnamed("ssh-rsa CCC"),
            ]);

            let err = ProvisioningOperation::new(services, None)
                .create(&mut user)
                .expect_err("second key rejected");

            assert!(err.to_string().contains("failed to add key to git server"));
            assert!(store.user(EMAIL).is_none());
            assert!(!repo.has_user(EMAIL));
            assert!(user.keys.iter().all(|k| k.name.is_empty()));
        }

        #[test]
        fn failed_record_removal_still_reports_repository_error() {
            let (services, store, _repo) = services(
                MockDocumentStore::new().failing_on(StoreCall::Remove),
                MockRepositoryManager::new().failing_on(RepositoryCall::CreateUser),
            );
            let mut user = make_user(EMAIL);

            let err = ProvisioningOperation::new(services, None)
                .create(&mut user)
                .expect_err("repository fails");

            assert!(matches!(err, OperationError::RepositoryUserCreate(_)));
            assert!(store.user(EMAIL).is_some());
        }

        #[test]
        fn duplicate_email_fails_before_repository() {
            let (services, _store, repo) = services(
                MockDocumentStore::new().with_user(make_user(EMAIL)),
                MockRepositoryManager::new(),
            );
            let mut user = make_user(EMAIL);

            let err = ProvisioningOperation::new(services, None)
                .create(&mut user)
                .expect_err("duplicate");

            assert!(matches!(err, OperationError::Store(_)));
            assert!(!repo.has_user(EMAIL));
        }

        #[test]
        fn invalid_email_is_rejected_before_any_write() {
            let (services, store, repo) =
                services(MockDocumentStore::new(), MockRepositoryManager::new());
            let mut user = make_user(EMAIL);
            user.email = "not-an-email".to_string();

            let err = ProvisioningOperation::new(services, None)
                .create(&mut user)
                .expect_err("invalid email");

            assert!(matches!(err, OperationError::Core(_)));
            assert!(store.user("not-an-email").is_none());
            assert!(!repo.has_user("not-an-email"));
        }

        #[test]
        fn registers_initial_keys_with_default_names() -> anyhow::Result<()> {
            let (services, store, repo) =
                services(MockDocumentStore::new(), MockRepositoryManager::new());
            let mut user = make_user(EMAIL).with_keys(vec![
                Key::unnamed("ssh-rsa AAA"),
                Key::new("desktop", "ssh-rsa BBB"),
            ]);

            ProvisioningOperation::new(services, None).create(&mut user)?;

            assert_eq!(user.keys[0].name, "a@x.com-1");
            assert_eq!(store.user(EMAIL).expect("stored").keys, user.keys);
            assert_eq!(repo.keys(EMAIL).len(), 2);
            Ok(())
        }

        #[test]
        fn default_name_avoids_later_explicit_name() -> anyhow::Result<()> {
            let (services, _store, repo) =
                services(MockDocumentStore::new(), MockRepositoryManager::new());
            let mut user = make_user(EMAIL).with_keys(vec![
                Key::unnamed("ssh-rsa AAA"),
                Key::new("a@x.com-1", "ssh-rsa BBB"),
            ]);

            ProvisioningOperation::new(services, None).create(&mut user)?;

            let names: Vec<_> = user.keys.iter().map(|k| k.name.as_str()).collect();
            assert_eq!(names, vec!["a@x.com-2", "a@x.com-1"]);
            assert_eq!(repo.keys(EMAIL).len(), 2);
            Ok(())
        }

        #[test]
        fn initial_keys_are_trimmed() -> anyhow::Result<()> {
            let (services, store, _repo) =
                services(MockDocumentStore::new(), MockRepositoryManager::new());
            let mut user = make_user(EMAIL).with_keys(vec![Key::new("laptop", "ssh-rsa AAA\n")]);

            ProvisioningOperation::new(services, None).create(&mut user)?;

            assert_eq!(store.user(EMAIL).expect("stored").keys[0].content, "ssh-rsa AAA");
            Ok(())
        }

        fn rejected_initial_keys(keys: Vec<Key>) -> OperationError {
            let (services, store, repo) = services(
                MockDocumentStore::new().failing_on(StoreCall::Insert),
                MockRepositoryManager::new().failing_on(RepositoryCall::CreateUser),
            );
            let mut user = make_user(EMAIL).with_keys(keys);

            let err = ProvisioningOperation::new(services, None)
                .create(&mut user)
                .expect_err("initial keys rejected");

            assert!(store.user(EMAIL).is_none());
            assert!(!repo.has_user(EMAIL));
            err
        }

        #[test]
        fn empty_initial_key_is_rejected_before_any_write() {
            let err = rejected_initial_keys(vec![
                Key::new("laptop", "ssh-rsa AAA"),
                Key::new("desktop", "   "),
            ]);

            assert!(matches!(err, OperationError::EmptyKeyContent));
        }

        #[test]
        fn multi_line_initial_key_is_rejected_before_any_write() {
            let err = rejected_initial_keys(vec![Key::unnamed(
                "ssh-ed25519 AAAA\nssh-ed25519 EVIL attacker",
            )]);

            assert!(matches!(err, OperationError::MultiLineKeyContent));
        }

        #[test]
        fn repeated_initial_content_is_rejected_before_any_write() {
            let err = rejected_initial_keys(vec![
                Key::new("laptop", "ssh-rsa AAA"),
                Key::new("desktop", "ssh-rsa AAA\n"),
            ]);

            assert!(matches!(err, OperationError::KeyAlreadyExists));
        }

        #[test]
        fn repeated_initial_name_is_rejected_before_any_write() {
            let err = rejected_initial_keys(vec![
                Key::new("laptop", "ssh-rsa AAA"),
                Key::new("laptop", "ssh-rsa BBB"),
            ]);

            assert!(matches!(err, OperationError::KeyAlreadyExists));
        }
    }

    mod quota {
        use super::*;

        fn created_quota(apps_per_user: Option<i64>, user: User) -> Quota {
            let (services, _store, _repo) =
                services(MockDocumentStore::new(), MockRepositoryManager::new());
            let mut user = user;
            ProvisioningOperation::new(services, apps_per_user)
                .create(&mut user)
                .expect("create succeeds");
            user.quota.expect("quota resolved")
        }

        #[test]
        fn configured_limit_applies() {
            assert_eq!(created_quota(Some(5), make_user(EMAIL)).limit, 5);
        }

        #[test]
        fn unlimited_without_configuration() {
            assert!(created_quota(None, make_user(EMAIL)).is_unlimited());
        }

        #[test]
        fn explicit_quota_is_kept() {
            let user = make_user(EMAIL).with_quota(Quota::with_limit(2));

            assert_eq!(created_quota(Some(5), user).limit, 2);
        }
    }

    mod delete {
        use super::*;

        #[test]
        fn removes_both_sides() {
            let (services, store, repo) = services(
                MockDocumentStore::new().with_user(make_user(EMAIL)),
                MockRepositoryManager::new().with_user(EMAIL),
            );

            let outcome = ProvisioningOperation::new(services, None).delete(&make_user(EMAIL));

            assert!(outcome.is_complete());
            assert!(store.user(EMAIL).is_none());
            assert!(!repo.has_user(EMAIL));
        }

        #[test]
        fn store_failure_does_not_block_repository_removal() {
            let (services, store, repo) = services(
                MockDocumentStore::new()
                    .with_user(make_user(EMAIL))
                    .failing_on(StoreCall::Remove),
                MockRepositoryManager::new().with_user(EMAIL),
            );

            let outcome = ProvisioningOperation::new(services, None).delete(&make_user(EMAIL));

            assert!(!outcome.record_removed);
            assert!(outcome.repository_user_removed);
            assert!(store.user(EMAIL).is_some());
            assert!(!repo.has_user(EMAIL));
        }

        #[test]
        fn repository_failure_does_not_block_record_removal() {
            let (services, store, _repo) = services(
                MockDocumentStore::new().with_user(make_user(EMAIL)),
                MockRepositoryManager::new()
                    .with_user(EMAIL)
                    .failing_on(RepositoryCall::RemoveUser),
            );

            let outcome = ProvisioningOperation::new(services, None).delete(&make_user(EMAIL));

            assert!(outcome.record_removed);
            assert!(!outcome.repository_user_removed);
            assert!(store.user(EMAIL).is_none());
        }
    }
}
