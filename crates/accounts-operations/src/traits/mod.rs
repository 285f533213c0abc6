mod document_store;
mod repository_manager;

pub use document_store::DocumentStore;
pub use repository_manager::RepositoryManager;
