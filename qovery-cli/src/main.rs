//! Qovery CLI
//!
//! Command-line interface for deploying and managing services on Qovery.

mod actions;
mod commands;
mod config;
mod error;
mod id_resolver;
#[cfg(test)]
mod test_support;
mod types;
mod watch;

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Command, CommandFactory, FromArgMatches, Parser};
use colored::*;
use commands::{Commands, handle_command};
use config::{Config, Context, DEFAULT_API_URL};
use error::CliError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use watch::WaitPolicy;

#[derive(Parser)]
#[command(name = "qovery")]
#[command(about = "Deploy and manage services on Qovery", long_about = None)]
struct Cli {
    /// Qovery API URL
    #[arg(long, global = true, env = "QOVERY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Access token (falls back to the context file)
    #[arg(long, global = true, env = "QOVERY_CLI_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Token type, `Bearer` or `Token`
    #[arg(long, global = true, env = "QOVERY_CLI_TOKEN_TYPE")]
    token_type: Option<String>,

    /// Context file (defaults to ~/.qovery/context.json)
    #[arg(long, global = true, env = "QOVERY_CONTEXT_FILE")]
    context_file: Option<PathBuf>,

    /// Seconds between two status polls
    #[arg(long, global = true, default_value_t = 5)]
    poll_interval_secs: u64,

    /// Give up waiting for a deployment after this many seconds
    #[arg(long, global = true, default_value_t = 3600)]
    max_wait_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    /// Log API calls and polling
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Full command tree with per-kind service flags applied
pub(crate) fn cli_command() -> Command {
    commands::with_service_flag_names(Cli::command())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(exit_code(&err));
        }
    };

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        report(&err);
        process::exit(1);
    }
}

fn parse_cli() -> Result<Cli, clap::Error> {
    let matches = cli_command().try_get_matches()?;
    Cli::from_arg_matches(&matches)
}

/// Usage errors exit 1 like every other error; `--help` exits 0
fn exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "qovery=debug" } else { "qovery=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let context_path = match cli.context_file {
        Some(path) => path,
        None => Context::default_path().ok_or_else(|| {
            CliError::validation("cannot locate the home directory: pass --context-file")
        })?,
    };

    let mut config = Config::new(cli.api_url, context_path);
    config.token = cli.token;
    config.token_type = cli.token_type;
    config.request_timeout = Duration::from_secs(cli.timeout_secs);
    config.wait = WaitPolicy::new(
        Duration::from_secs(cli.poll_interval_secs),
        Duration::from_secs(cli.max_wait_secs),
    );
    config.context = Context::load(&config.context_path).with_context(|| {
        format!(
            "Failed to load the context from {}",
            config.context_path.display()
        )
    })?;
    config.validate()?;

    handle_command(cli.command, &mut config).await
}

fn report(err: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), err);
    if let Some(hint) = error::hint_for(err) {
        eprintln!("{} {}", "hint:".yellow().bold(), hint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_usage_errors_exit_one() {
        let err = cli_command()
            .try_get_matches_from(["qovery", "cronjob", "deploy", "--bogus"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_help_exits_zero() {
        let err = cli_command()
            .try_get_matches_from(["qovery", "--help"])
            .unwrap_err();
        assert_eq!(exit_code(&err), 0);
    }
}
