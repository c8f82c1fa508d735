//! Environment command handlers

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::*;
use qovery_client::{QoveryClient, ScopeApi};

use super::{ScopeArgs, print_json};
use crate::actions::environment::{EnvironmentAction, run_environment_action};
use crate::actions::single::cancel_environment;
use crate::actions::{ActionContext, Outcome};
use crate::config::Config;
use crate::id_resolver::{environment_scope, project_scope};
use crate::watch::colorize_state;

/// Environment subcommands
#[derive(Subcommand)]
pub enum EnvironmentCommands {
    /// List environments of a project
    List {
        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(long)]
        json: bool,
    },
    /// Deploy every service of the environment
    Deploy {
        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(short, long)]
        watch: bool,
    },
    /// Stop every service of the environment
    Stop {
        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(short, long)]
        watch: bool,
    },
    /// Cancel the running deployment
    Cancel {
        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(short, long)]
        watch: bool,
    },
    /// Show the environment and service states
    Status {
        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(long)]
        json: bool,
    },
}

/// Handle environment commands
pub async fn handle_environment_command(
    client: &QoveryClient,
    config: &Config,
    command: EnvironmentCommands,
) -> Result<()> {
    match command {
        EnvironmentCommands::List { scope, json } => {
            let project_id = project_scope(client, &scope.input(), &config.context).await?;
            let environments = client.list_environments(&project_id).await?;

            if json {
                return print_json(&environments);
            }
            if environments.is_empty() {
                println!("{}", "No environments found.".yellow());
                return Ok(());
            }
            println!("{}", format!("Found {} environment(s):", environments.len()).bold());
            println!();
            for environment in environments {
                println!(
                    "  {} {} {}",
                    "▸".cyan(),
                    environment.name.bold(),
                    environment.id.dimmed()
                );
                if let Some(mode) = environment.mode {
                    println!("    Mode: {}", mode);
                }
            }
            Ok(())
        }
        EnvironmentCommands::Deploy { scope, watch } => {
            run(client, config, &scope, EnvironmentAction::Deploy, watch).await
        }
        EnvironmentCommands::Stop { scope, watch } => {
            run(client, config, &scope, EnvironmentAction::Stop, watch).await
        }
        EnvironmentCommands::Cancel { scope, watch } => {
            let env = environment_scope(client, &scope.input(), &config.context).await?;
            let ctx = ActionContext {
                api: client,
                environment_id: env.environment_id(),
                policy: config.wait,
                watch,
            };

            match cancel_environment(&ctx, None).await? {
                Outcome::Skipped(message) => println!("{} {}", "✓".green().bold(), message),
                Outcome::InProgress => println!(
                    "{} Cancellation of {} requested",
                    "✓".green().bold(),
                    env.environment.name().bold()
                ),
                Outcome::Finished(state) => println!(
                    "{} {}: {}",
                    "✓".green().bold(),
                    env.environment.name().bold(),
                    colorize_state(state)
                ),
            }
            Ok(())
        }
        EnvironmentCommands::Status { scope, json } => {
            let env = environment_scope(client, &scope.input(), &config.context).await?;
            let statuses = client.get_environment_statuses(env.environment_id()).await?;

            if json {
                return print_json(&statuses);
            }
            println!(
                "{} {}",
                env.environment.name().bold(),
                colorize_state(statuses.environment.state)
            );
            if let Some(date) = statuses.environment.last_deployment_date {
                println!("  Last deployment: {}", date.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            for service in statuses.services() {
                println!(
                    "  {} {} {}",
                    "▸".cyan(),
                    service.id.dimmed(),
                    colorize_state(service.state)
                );
            }
            Ok(())
        }
    }
}

async fn run(
    client: &QoveryClient,
    config: &Config,
    scope: &ScopeArgs,
    action: EnvironmentAction,
    watch: bool,
) -> Result<()> {
    let env = environment_scope(client, &scope.input(), &config.context).await?;
    let ctx = ActionContext {
        api: client,
        environment_id: env.environment_id(),
        policy: config.wait,
        watch,
    };

    let outcome = run_environment_action(&ctx, action)
        .await
        .with_context(|| format!("Failed to {} environment {}", action.verb(), env.environment))?;
    match outcome {
        Outcome::Finished(state) => println!(
            "{} {}: {}",
            "✓".green().bold(),
            env.environment.name().bold(),
            colorize_state(state)
        ),
        _ => println!(
            "{} {} of {} requested",
            "✓".green().bold(),
            action.verb(),
            env.environment.name().bold()
        ),
    }
    Ok(())
}
