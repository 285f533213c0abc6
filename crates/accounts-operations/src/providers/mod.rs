mod json_store;
mod key_registry;

pub use json_store::JsonDocumentStore;
pub use key_registry::FileSystemRepositoryManager;
