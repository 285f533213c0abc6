mod context;
mod key;
mod token;
mod user;

use accounts_config::AccountsConfig;
use clap::Subcommand;

use self::context::Accounts;
use self::key::KeyCommand;
use self::token::TokenCommand;
use self::user::UserCommand;
use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create, delete and inspect users
    #[command(subcommand)]
    User(UserCommand),
    /// Manage the public keys of a user
    #[command(subcommand)]
    Key(KeyCommand),
    /// Show or regenerate the API token of a user
    #[command(subcommand)]
    Token(TokenCommand),
    /// Print every registered key in authorized_keys format
    AuthorizedKeys,
}

impl Commands {
    pub(crate) fn execute(self, config: &AccountsConfig) -> Result<()> {
        let accounts = Accounts::new(config);
        match self {
            Self::User(command) => command.run(&accounts),
            Self::Key(command) => command.run(&accounts),
            Self::Token(command) => command.run(&accounts),
            Self::AuthorizedKeys => {
                let rendered = accounts.registry().authorized_keys()?;
                if !rendered.is_empty() {
                    println!("{rendered}");
                }
                Ok(())
            }
        }
    }
}
