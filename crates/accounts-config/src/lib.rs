mod config;
mod error;

pub use config::{
    AccountsConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, DEFAULT_REPOSITORY_ROOT,
    DEFAULT_STORE_FILE,
};
pub use error::ConfigError;
