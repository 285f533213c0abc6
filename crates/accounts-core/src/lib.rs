mod api_key;
mod email;
pub mod error;
pub mod types;

pub use api_key::generate_api_key;
pub use email::{is_valid_email, validate_email};
pub use error::*;
pub use types::*;
