use accounts_core::{Key, User};

/// State of one key registration or removal.
///
/// `next_keys` is computed before the pipeline starts; `user` only takes it
/// over once the document store accepted the write.
pub struct KeyContext {
    user: User,
    key: Key,
    next_keys: Vec<Key>,
}

impl KeyContext {
    #[must_use]
    pub fn new(user: User, key: Key, next_keys: Vec<Key>) -> Self {
        Self {
            user,
            key,
            next_keys,
        }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    #[must_use]
    pub fn next_keys(&self) -> &[Key] {
        &self.next_keys
    }

    /// The user record as it would be persisted.
    pub(super) fn next_user(&self) -> User {
        self.user.clone().with_keys(self.next_keys.clone())
    }

    pub(super) fn commit(&mut self, user: User) {
        self.user = user;
    }

    pub(super) fn into_parts(self) -> (User, Key) {
        (self.user, self.key)
    }
}
