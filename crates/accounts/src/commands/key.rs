use std::fs;
use std::path::PathBuf;

use accounts_core::Key;
use clap::Subcommand;

use super::context::Accounts;
use crate::error::{CliError, Result};

#[derive(Subcommand)]
pub(crate) enum KeyCommand {
    /// Register a public key for a user
    Add {
        email: String,
        /// Key material, e.g. "ssh-ed25519 AAAA..."
        #[arg(conflicts_with = "file")]
        content: Option<String>,
        /// Read the key from a file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Key name; defaults to <email>-<n>
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a key, given its name or its content
    Remove { email: String, key: String },
    /// List the keys registered for a user
    List { email: String },
}

impl KeyCommand {
    pub(crate) fn run(self, accounts: &Accounts) -> Result<()> {
        match self {
            Self::Add {
                email,
                content,
                file,
                name,
            } => {
                let content = match (content, file) {
                    (Some(content), _) => content,
                    (None, Some(path)) => fs::read_to_string(path)?,
                    (None, None) => return Err(CliError::MissingKey),
                };
                let mut user = accounts.queries().get_user_by_email(&email)?;
                let key = accounts
                    .keys()
                    .add_key(&mut user, Key::new(name.unwrap_or_default(), content))?;
                println!("Added key {} to {email}", key.name);
                Ok(())
            }
            Self::Remove { email, key } => {
                let mut user = accounts.queries().get_user_by_email(&email)?;
                let removed = accounts
                    .keys()
                    .remove_key(&mut user, &Key::new(key.clone(), key))?;
                println!("Removed key {} from {email}", removed.name);
                Ok(())
            }
            Self::List { email } => {
                let queries = accounts.queries();
                let user = queries.get_user_by_email(&email)?;
                for (name, content) in queries.list_keys(&user)? {
                    println!("{name}\t{content}");
                }
                Ok(())
            }
        }
    }
}
