mod actions;
mod context;
mod operation;

pub use context::ProvisioningContext;
pub use operation::{DeleteOutcome, ProvisioningOperation};
