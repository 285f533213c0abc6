use accounts_core::{Key, Quota, User};
use clap::Subcommand;
use dialoguer::Confirm;

use super::context::Accounts;
use crate::environment::is_interactive;
use crate::error::{CliError, Result};

#[derive(Subcommand)]
pub(crate) enum UserCommand {
    /// Create a user in the document store and the key registry
    Create {
        email: String,
        /// Maximum number of apps; defaults to the configured per-user limit
        #[arg(long)]
        quota: Option<i64>,
        /// Public keys to register with the user
        #[arg(long = "key", value_name = "KEY")]
        keys: Vec<String>,
    },
    /// Delete a user from both stores
    Delete {
        email: String,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show a user record
    Show { email: String },
    /// List all users
    List,
    /// List the teams a user belongs to
    Teams { email: String },
    /// List the apps a user may access through its teams
    Apps { email: String },
    /// Tell whether a user is in the admin team
    IsAdmin { email: String },
}

impl UserCommand {
    pub(crate) fn run(self, accounts: &Accounts) -> Result<()> {
        match self {
            Self::Create { email, quota, keys } => create(accounts, email, quota, keys),
            Self::Delete { email, yes } => delete(accounts, &email, yes),
            Self::Show { email } => {
                let user = accounts.queries().get_user_by_email(&email)?;
                print_user(&user);
                Ok(())
            }
            Self::List => {
                for user in accounts.queries().list_users()? {
                    println!("{}", user.email);
                }
                Ok(())
            }
            Self::Teams { email } => {
                let queries = accounts.queries();
                let user = queries.get_user_by_email(&email)?;
                for team in queries.teams(&user)? {
                    println!("{}", team.name);
                }
                Ok(())
            }
            Self::Apps { email } => {
                let queries = accounts.queries();
                let user = queries.get_user_by_email(&email)?;
                for app in queries.allowed_apps(&user)? {
                    println!("{app}");
                }
                Ok(())
            }
            Self::IsAdmin { email } => {
                let queries = accounts.queries();
                let user = queries.get_user_by_email(&email)?;
                println!("{}", queries.is_admin(&user));
                Ok(())
            }
        }
    }
}

fn create(accounts: &Accounts, email: String, quota: Option<i64>, keys: Vec<String>) -> Result<()> {
    let mut user = User::new(email)?.with_keys(keys.into_iter().map(Key::unnamed).collect());
    if let Some(limit) = quota {
        user = user.with_quota(Quota::with_limit(limit));
    }

    accounts.provisioning().create(&mut user)?;

    println!("Created user {}", user.email);
    Ok(())
}

fn delete(accounts: &Accounts, email: &str, yes: bool) -> Result<()> {
    let user = accounts.queries().get_user_by_email(email)?;

    if !yes {
        if !is_interactive() {
            return Err(CliError::ConfirmationRequired {
                email: email.to_string(),
            });
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete user {email} and all of its keys?"))
            .default(false)
            .interact()
            .map_err(dialoguer_to_cli_error)?;
        if !confirmed {
            return Err(CliError::Cancelled);
        }
    }

    let outcome = accounts.provisioning().delete(&user);
    if !outcome.is_complete() {
        return Err(CliError::IncompleteDeletion {
            email: email.to_string(),
        });
    }

    println!("Deleted user {email}");
    Ok(())
}

fn print_user(user: &User) {
    println!("email: {}", user.email);
    match user.quota {
        Some(quota) if quota.is_unlimited() => println!("quota: unlimited ({} in use)", quota.in_use),
        Some(quota) => println!("quota: {} ({} in use)", quota.limit, quota.in_use),
        None => println!("quota: not set"),
    }
    if user.keys.is_empty() {
        println!("keys: none");
    } else {
        println!("keys:");
        for key in &user.keys {
            println!("  {}  {}", key.name, key.content);
        }
    }
}

fn dialoguer_to_cli_error(e: dialoguer::Error) -> CliError {
    match e {
        dialoguer::Error::IO(io_err) => CliError::Io(io_err),
    }
}
