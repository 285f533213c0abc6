mod actions;
mod content;
mod context;
mod operation;

pub(crate) use content::checked_key;
pub use context::KeyContext;
pub use operation::KeyOperation;
