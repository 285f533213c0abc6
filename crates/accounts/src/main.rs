mod commands;
mod environment;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use accounts_config::{AccountsConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Commands;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "accounts")]
#[command(about = "Manage platform users and their git keys", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, short = 'c', global = true, env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = AccountsConfig::load(&cli.config)
        .map_err(CliError::from)
        .and_then(|config| cli.command.execute(&config));

    if let Err(e) = result {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "accounts=debug"
    } else {
        "accounts=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
