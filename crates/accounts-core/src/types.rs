use serde::{Deserialize, Serialize};

use crate::email::validate_email;
use crate::error::Result;

/// A named public-key credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    #[serde(default)]
    pub name: String,
    pub content: String,
}

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// A key without a name; one is assigned when it is added to a user.
    #[must_use]
    pub fn unnamed(content: impl Into<String>) -> Self {
        Self::new(String::new(), content)
    }

    /// The key with surrounding whitespace stripped from its content.
    #[must_use]
    pub fn trimmed(self) -> Self {
        let content = self.content.trim();
        if content.len() == self.content.len() {
            return self;
        }
        Self::new(self.name, content)
    }

    /// Whether the content contains a line break.
    #[must_use]
    pub fn is_multi_line(&self) -> bool {
        self.content.contains(['\r', '\n'])
    }

    /// Whether `other` refers to the same credential, by name or by content.
    ///
    /// Empty fields never match, so a lookup by name alone does not collide
    /// with keys whose content happens to be empty and vice versa.
    #[must_use]
    pub fn matches(&self, other: &Key) -> bool {
        (!other.name.is_empty() && self.name == other.name)
            || (!other.content.is_empty() && self.content == other.content)
    }
}

/// App quota of a user. A negative limit means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub limit: i64,
    #[serde(default)]
    pub in_use: i64,
}

impl Quota {
    pub const UNLIMITED: i64 = -1;

    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            limit: Self::UNLIMITED,
            in_use: 0,
        }
    }

    #[must_use]
    pub fn with_limit(limit: i64) -> Self {
        Self { limit, in_use: 0 }
    }

    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.limit < 0
    }

    /// Quota for a user created without one: unlimited, unless a
    /// non-negative per-user app limit is configured.
    #[must_use]
    pub fn for_new_user(apps_per_user: Option<i64>) -> Self {
        match apps_per_user {
            Some(limit) if limit > Self::UNLIMITED => Self::with_limit(limit),
            _ => Self::unlimited(),
        }
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    /// Password hash; never the clear-text password.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub keys: Vec<Key>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<Quota>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl User {
    /// # Errors
    ///
    /// Returns `AccountError::InvalidEmail` if `email` is not a valid address.
    pub fn new(email: impl Into<String>) -> Result<Self> {
        let email = email.into();
        validate_email(&email)?;
        Ok(Self {
            email,
            password: String::new(),
            keys: Vec::new(),
            quota: None,
            api_key: None,
        })
    }

    #[must_use]
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password = hash.into();
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: Vec<Key>) -> Self {
        self.keys = keys;
        self
    }

    #[must_use]
    pub fn with_quota(mut self, quota: Quota) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Position and value of the first key matching `key` by name or content.
    #[must_use]
    pub fn find_key(&self, key: &Key) -> Option<(usize, &Key)> {
        self.keys.iter().enumerate().find(|(_, k)| k.matches(key))
    }

    #[must_use]
    pub fn has_key(&self, key: &Key) -> bool {
        self.find_key(key).is_some()
    }

    /// First unused `<email>-<n>` name, counting from one past the number
    /// of keys the user already has.
    #[must_use]
    pub fn next_key_name(&self) -> String {
        self.next_key_name_excluding(&[])
    }

    /// Like [`next_key_name`](Self::next_key_name), but also skips the
    /// names in `reserved`.
    #[must_use]
    pub fn next_key_name_excluding(&self, reserved: &[String]) -> String {
        (self.keys.len() + 1..)
            .map(|n| format!("{}-{n}", self.email))
            .find(|name| self.keys.iter().all(|k| &k.name != name) && !reserved.contains(name))
            .unwrap_or_default()
    }

    /// The key list with `key` appended. `self` is left untouched.
    #[must_use]
    pub fn keys_with(&self, key: Key) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.extend(self.keys.iter().cloned());
        keys.push(key);
        keys
    }

    /// The key list without the key at `index`, remaining order preserved.
    #[must_use]
    pub fn keys_without(&self, index: usize) -> Vec<Key> {
        self.keys
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub users: Vec<String>,
}

impl Team {
    #[must_use]
    pub fn has_member(&self, email: &str) -> bool {
        self.users.iter().any(|u| u == email)
    }
}

#[must_use]
pub fn team_names(teams: &[Team]) -> Vec<String> {
    teams.iter().map(|t| t.name.clone()).collect()
}

/// An application owned by one or more teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub teams: Vec<String>,
}

impl Application {
    #[must_use]
    pub fn is_owned_by_any(&self, team_names: &[String]) -> bool {
        self.teams.iter().any(|t| team_names.contains(t))
    }
}
