//! Document store backed by a single JSON file.
//!
//! Every write loads the file, applies one change and writes the result back
//! through a uniquely named temporary file and a rename, so each write
//! replaces the whole document set at once. Writes are serialized by an
//! in-process lock and an exclusive lock on `<path>.lock`; readers never see
//! a partially written file.

mod error;
mod store;

pub use error::StoreError;
pub use store::JsonStore;
