//! Git key registry stored on the filesystem.
//!
//! Each registered user owns a directory under the registry root named after
//! their email; each key is a `<name>.pub` file inside it holding the key
//! material. [`KeyRegistry::authorized_keys`] renders the whole registry in
//! `authorized_keys` format for the git SSH frontend.

mod error;
mod registry;

pub use error::RepositoryError;
pub use registry::{KeyRegistry, RepositoryKey};
