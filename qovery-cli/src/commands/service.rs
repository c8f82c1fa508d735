//! Service command handlers
//!
//! One set of subcommands serves applications, containers, jobs, cronjobs and
//! lifecycle jobs; the kind is fixed by the parent command.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::*;
use qovery_client::{QoveryClient, ScopeApi};
use qovery_core::domain::service::ServiceKind;
use serde::Serialize;

use super::variable::{self, VariableCommands};
use super::{ScopeArgs, print_json};
use crate::actions::bulk::{BulkAction, BulkOutcome, dispatch_bulk};
use crate::actions::clone::{CloneTarget, clone_service};
use crate::actions::single::{cancel_one, delete_one, deploy_one, redeploy_one, stop_one};
use crate::actions::update::{UpdateFlags, update_service};
use crate::actions::{ActionContext, Outcome, Selection, VersionFlags, current_version, select_target};
use crate::config::Config;
use crate::id_resolver::{EnvironmentScope, environment_scope, list_services};
use crate::watch::colorize_state;

/// Single or bulk target; renamed to `--<kind>`/`--<kinds>` at startup
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Name of the service
    #[arg(long)]
    pub service: Option<String>,

    /// Comma-separated service names
    #[arg(long)]
    pub services: Option<String>,
}

/// Service subcommands
#[derive(Subcommand)]
pub enum ServiceCommands {
    /// List services with their state
    List {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Deploy one or several services
    Deploy {
        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        target: TargetArgs,

        /// Git commit to deploy
        #[arg(short = 'c', long)]
        commit_id: Option<String>,

        /// Image tag to deploy
        #[arg(short = 't', long)]
        tag: Option<String>,

        /// Follow the deployment until it completes
        #[arg(short, long)]
        watch: bool,
    },
    /// Stop one or several services
    Stop {
        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        target: TargetArgs,

        /// Follow until the services are stopped
        #[arg(short, long)]
        watch: bool,
    },
    /// Delete one or several services
    Delete {
        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        target: TargetArgs,

        /// Follow until the services are deleted
        #[arg(short, long)]
        watch: bool,
    },
    /// Redeploy a service at its current version
    Redeploy {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Name of the service
        #[arg(long)]
        service: String,

        #[arg(short, long)]
        watch: bool,
    },
    /// Cancel the deployment running on the service's environment
    Cancel {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Name of the service
        #[arg(long)]
        service: String,

        #[arg(short, long)]
        watch: bool,
    },
    /// Clone a service into the same or another environment
    Clone {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Name of the service
        #[arg(long)]
        service: String,

        /// Project of the target environment (defaults to the source project)
        #[arg(long)]
        target_project: Option<String>,

        /// Target environment (defaults to the source environment name)
        #[arg(long)]
        target_environment: Option<String>,

        /// Name of the clone (defaults to the source name)
        #[arg(long)]
        target_name: Option<String>,
    },
    /// Change the branch, image name or tag of a service
    Update {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Name of the service
        #[arg(long)]
        service: String,

        /// Git branch to build from
        #[arg(short = 'b', long)]
        branch: Option<String>,

        /// Image tag to run
        #[arg(short = 't', long)]
        tag: Option<String>,

        /// Image name to run
        #[arg(long)]
        image_name: Option<String>,
    },
    /// Environment variables and secrets
    Env {
        #[command(subcommand)]
        command: VariableCommands,
    },
}

/// Handle service commands
///
/// Flag combinations are checked before any request is sent.
///
/// # Arguments
/// * `config` - The CLI configuration
/// * `kind` - Kind fixed by the parent command
/// * `command` - The service command to execute
pub async fn handle_service_command(
    config: &Config,
    kind: ServiceKind,
    command: ServiceCommands,
) -> Result<()> {
    match command {
        ServiceCommands::List { scope, json } => {
            let client = config.client()?;
            let env = environment_scope(&client, &scope.input(), &config.context).await?;
            list(&client, &env, kind, json).await
        }
        ServiceCommands::Deploy {
            scope,
            target,
            commit_id,
            tag,
            watch,
        } => {
            let selection = select_target(kind, target.service.as_deref(), target.services.as_deref())?;
            let version = VersionFlags { tag, commit_id };
            version.requested(kind)?;

            let client = config.client()?;
            let env = environment_scope(&client, &scope.input(), &config.context).await?;
            let ctx = action_context(&client, &env, config, watch);

            match selection {
                Selection::One(name) => {
                    let outcome = deploy_one(&ctx, kind, &name, &version)
                        .await
                        .with_context(|| format!("Failed to deploy {} {}", kind, name))?;
                    report_outcome(kind, &name, "deploy", outcome);
                    Ok(())
                }
                Selection::Many(names) => {
                    let action = BulkAction::Deploy(version);
                    let outcome = dispatch_bulk(&ctx, kind, &action, names).await?;
                    report_bulk(kind, &action, &outcome)
                }
            }
        }
        ServiceCommands::Stop {
            scope,
            target,
            watch,
        } => {
            let selection = select_target(kind, target.service.as_deref(), target.services.as_deref())?;

            let client = config.client()?;
            let env = environment_scope(&client, &scope.input(), &config.context).await?;
            let ctx = action_context(&client, &env, config, watch);

            match selection {
                Selection::One(name) => {
                    let outcome = stop_one(&ctx, kind, &name)
                        .await
                        .with_context(|| format!("Failed to stop {} {}", kind, name))?;
                    report_outcome(kind, &name, "stop", outcome);
                    Ok(())
                }
                Selection::Many(names) => {
                    let outcome = dispatch_bulk(&ctx, kind, &BulkAction::Stop, names).await?;
                    report_bulk(kind, &BulkAction::Stop, &outcome)
                }
            }
        }
        ServiceCommands::Delete {
            scope,
            target,
            watch,
        } => {
            let selection = select_target(kind, target.service.as_deref(), target.services.as_deref())?;

            let client = config.client()?;
            let env = environment_scope(&client, &scope.input(), &config.context).await?;
            let ctx = action_context(&client, &env, config, watch);

            match selection {
                Selection::One(name) => {
                    let outcome = delete_one(&ctx, kind, &name)
                        .await
                        .with_context(|| format!("Failed to delete {} {}", kind, name))?;
                    report_outcome(kind, &name, "delete", outcome);
                    Ok(())
                }
                Selection::Many(names) => {
                    let outcome = dispatch_bulk(&ctx, kind, &BulkAction::Delete, names).await?;
                    report_bulk(kind, &BulkAction::Delete, &outcome)
                }
            }
        }
        ServiceCommands::Redeploy {
            scope,
            service,
            watch,
        } => {
            let client = config.client()?;
            let env = environment_scope(&client, &scope.input(), &config.context).await?;
            let ctx = action_context(&client, &env, config, watch);

            let outcome = redeploy_one(&ctx, kind, &service)
                .await
                .with_context(|| format!("Failed to redeploy {} {}", kind, service))?;
            report_outcome(kind, &service, "redeploy", outcome);
            Ok(())
        }
        ServiceCommands::Cancel {
            scope,
            service,
            watch,
        } => {
            let client = config.client()?;
            let env = environment_scope(&client, &scope.input(), &config.context).await?;
            let ctx = action_context(&client, &env, config, watch);

            let outcome = cancel_one(&ctx, kind, &service).await?;
            report_outcome(kind, &service, "cancel", outcome);
            Ok(())
        }
        ServiceCommands::Clone {
            scope,
            service,
            target_project,
            target_environment,
            target_name,
        } => {
            let client = config.client()?;
            let env = environment_scope(&client, &scope.input(), &config.context).await?;
            let target = CloneTarget {
                project: target_project,
                environment: target_environment,
                name: target_name,
            };

            let created = clone_service(&client, &env, kind, &service, &target)
                .await
                .with_context(|| format!("Failed to clone {} {}", kind, service))?;
            println!(
                "{} Cloned {} {} as {} {}",
                "✓".green().bold(),
                kind,
                service.bold(),
                created.name.bold(),
                format!("({})", created.id).dimmed()
            );
            Ok(())
        }
        ServiceCommands::Update {
            scope,
            service,
            branch,
            tag,
            image_name,
        } => {
            let flags = UpdateFlags {
                branch,
                tag,
                image_name,
            };
            flags.validate(kind)?;

            let client = config.client()?;
            let env = environment_scope(&client, &scope.input(), &config.context).await?;

            let updated = update_service(&client, env.environment_id(), kind, &service, &flags)
                .await
                .with_context(|| format!("Failed to update {} {}", kind, service))?;
            println!(
                "{} Updated {} {}",
                "✓".green().bold(),
                kind,
                updated.name.bold()
            );
            Ok(())
        }
        ServiceCommands::Env { command } => {
            variable::handle_variable_command(config, kind, command).await
        }
    }
}

fn action_context<'a>(
    client: &'a QoveryClient,
    env: &'a EnvironmentScope,
    config: &Config,
    watch: bool,
) -> ActionContext<'a, QoveryClient> {
    ActionContext {
        api: client,
        environment_id: env.environment_id(),
        policy: config.wait,
        watch,
    }
}

// ===== Output =====

#[derive(Serialize)]
struct ServiceRow {
    id: String,
    name: String,
    kind: ServiceKind,
    source: &'static str,
    version: Option<String>,
    state: Option<String>,
}

async fn list(
    client: &QoveryClient,
    env: &EnvironmentScope,
    kind: ServiceKind,
    json: bool,
) -> Result<()> {
    let services = list_services(client, env.environment_id(), kind).await?;
    let statuses = client.get_environment_statuses(env.environment_id()).await?;

    let rows: Vec<ServiceRow> = services
        .iter()
        .map(|service| ServiceRow {
            id: service.id.clone(),
            name: service.name.clone(),
            kind: service.kind,
            source: service.source.label(),
            version: current_version(service).map(|v| v.version().to_string()),
            state: statuses.service_state(&service.id).map(|s| s.to_string()),
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!(
            "{}",
            format!("No {} found in {}.", kind.plural(), env.environment.name()).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} {} in {}:", rows.len(), kind.plural(), env.environment.name()).bold()
    );
    println!();
    for (service, row) in services.iter().zip(&rows) {
        let state = statuses
            .service_state(&service.id)
            .map(colorize_state)
            .unwrap_or_else(|| "-".dimmed());
        println!("  {} {} {}", "▸".cyan(), row.name.bold(), row.id.dimmed());
        println!("    Kind:    {}", row.kind);
        println!(
            "    Source:  {} {}",
            row.source,
            row.version.as_deref().unwrap_or("-").dimmed()
        );
        println!("    State:   {}", state);
    }

    Ok(())
}

fn report_outcome(kind: ServiceKind, name: &str, verb: &str, outcome: Outcome) {
    match outcome {
        Outcome::Skipped(message) => println!("{} {}", "✓".green().bold(), message),
        Outcome::InProgress => {
            println!("{} {} of {} {} requested", "✓".green().bold(), verb, kind, name.bold());
            println!("{}", "  Use --watch to follow progress.".dimmed());
        }
        Outcome::Finished(state) => println!(
            "{} {} {}: {}",
            "✓".green().bold(),
            kind,
            name.bold(),
            colorize_state(state)
        ),
    }
}

fn report_bulk(kind: ServiceKind, action: &BulkAction, outcome: &BulkOutcome) -> Result<()> {
    let names: Vec<&str> = outcome.services.iter().map(|s| s.name.as_str()).collect();

    match &outcome.final_states {
        None => {
            println!(
                "{} {} of {} {} requested: {}",
                "✓".green().bold(),
                action.verb(),
                names.len(),
                kind.plural(),
                names.join(", ")
            );
            println!("{}", "  Use --watch to follow progress.".dimmed());
        }
        Some(states) => {
            for (name, state) in states {
                println!("  {} {} {}", "▸".cyan(), name.bold(), colorize_state(*state));
            }
        }
    }

    outcome.ensure_success()?;
    Ok(())
}
