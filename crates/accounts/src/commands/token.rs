use clap::Subcommand;

use super::context::Accounts;
use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum TokenCommand {
    /// Print the API token, creating one if the user has none
    Show { email: String },
    /// Replace the API token with a new one
    Regenerate { email: String },
}

impl TokenCommand {
    pub(crate) fn run(self, accounts: &Accounts) -> Result<()> {
        let queries = accounts.queries();
        let token = match self {
            Self::Show { email } => {
                let mut user = queries.get_user_by_email(&email)?;
                queries.show_api_key(&mut user)?
            }
            Self::Regenerate { email } => {
                let mut user = queries.get_user_by_email(&email)?;
                queries.regenerate_api_key(&mut user)?
            }
        };
        println!("{token}");
        Ok(())
    }
}
