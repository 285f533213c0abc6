use accounts_core::User;

/// The user being provisioned, with quota and key names already resolved.
pub struct ProvisioningContext {
    user: User,
    registered_keys: usize,
}

impl ProvisioningContext {
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            user,
            registered_keys: 0,
        }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Keys registered with the repository manager so far.
    #[must_use]
    pub fn registered_keys(&self) -> usize {
        self.registered_keys
    }

    pub(super) fn record_registered_key(&mut self) {
        self.registered_keys += 1;
    }

    pub(super) fn into_user(self) -> User {
        self.user
    }
}
