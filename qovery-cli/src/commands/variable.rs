//! Environment variable command handlers
//!
//! Thin wrappers over the variable endpoints, scoped to one service.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use qovery_client::{QoveryClient, VariableApi};
use qovery_core::domain::service::{ServiceHandle, ServiceKind};
use qovery_core::domain::variable::{Variable, VariableScope};
use qovery_core::dto::variable::{CreateAlias, CreateOverride, CreateVariable, EditVariable};

use super::{ScopeArgs, print_json};
use crate::config::Config;
use crate::id_resolver::{environment_scope, find_service, list_variables, resolve_variable};

/// Service whose variables are managed
#[derive(Debug, Clone, Args)]
pub struct VariableTarget {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Name of the service
    #[arg(long)]
    pub service: String,
}

/// Variable subcommands
#[derive(Subcommand)]
pub enum VariableCommands {
    /// List variables visible from the service
    List {
        #[command(flatten)]
        target: VariableTarget,

        #[arg(long)]
        json: bool,
    },
    /// Create a variable or secret on the service
    Create {
        #[command(flatten)]
        target: VariableTarget,

        #[arg(short, long)]
        key: String,

        #[arg(long)]
        value: String,

        /// Store as a secret; its value is never returned
        #[arg(long)]
        secret: bool,
    },
    /// Change the value of a variable
    Update {
        #[command(flatten)]
        target: VariableTarget,

        #[arg(short, long)]
        key: String,

        #[arg(long)]
        value: String,
    },
    /// Delete a variable
    Delete {
        #[command(flatten)]
        target: VariableTarget,

        #[arg(short, long)]
        key: String,
    },
    /// Aliases of existing variables
    Alias {
        #[command(subcommand)]
        command: AliasCommands,
    },
    /// Overrides of existing variables
    Override {
        #[command(subcommand)]
        command: OverrideCommands,
    },
}

#[derive(Subcommand)]
pub enum AliasCommands {
    /// Expose an existing variable under another key on the service
    Create {
        #[command(flatten)]
        target: VariableTarget,

        /// Key of the aliased variable
        #[arg(short, long)]
        key: String,

        /// New key
        #[arg(long)]
        alias: String,
    },
}

#[derive(Subcommand)]
pub enum OverrideCommands {
    /// Override the value of an inherited variable on the service
    Create {
        #[command(flatten)]
        target: VariableTarget,

        /// Key of the overridden variable
        #[arg(short, long)]
        key: String,

        #[arg(long)]
        value: String,
    },
}

/// Handle variable commands for services of `kind`
pub async fn handle_variable_command(
    config: &Config,
    kind: ServiceKind,
    command: VariableCommands,
) -> Result<()> {
    let client = config.client()?;

    match command {
        VariableCommands::List { target, json } => {
            let service = target_service(&client, config, kind, &target).await?;
            let variables = list_variables(&client, &service).await?;
            if json {
                return print_json(&variables);
            }
            print_variables(&service, &variables);
            Ok(())
        }
        VariableCommands::Create {
            target,
            key,
            value,
            secret,
        } => {
            let service = target_service(&client, config, kind, &target).await?;
            let request = CreateVariable {
                key,
                value,
                is_secret: secret,
                variable_scope: VariableScope::for_kind(service.kind),
                variable_parent_id: service.id.clone(),
            };
            let created = client.create_variable(&request).await?;
            println!("{} Created {}", "✓".green().bold(), created.key.bold());
            Ok(())
        }
        VariableCommands::Update { target, key, value } => {
            let service = target_service(&client, config, kind, &target).await?;
            let variable = resolve_variable(&client, &service, &key).await?;
            let request = EditVariable {
                key: variable.key.clone(),
                value,
            };
            client.edit_variable(&variable.id, &request).await?;
            println!("{} Updated {}", "✓".green().bold(), variable.key.bold());
            Ok(())
        }
        VariableCommands::Delete { target, key } => {
            let service = target_service(&client, config, kind, &target).await?;
            let variable = resolve_variable(&client, &service, &key).await?;
            client.delete_variable(&variable.id).await?;
            println!("{} Deleted {}", "✓".green().bold(), variable.key.bold());
            Ok(())
        }
        VariableCommands::Alias {
            command: AliasCommands::Create { target, key, alias },
        } => {
            let service = target_service(&client, config, kind, &target).await?;
            let variable = resolve_variable(&client, &service, &key).await?;
            let request = CreateAlias {
                key: alias,
                alias_scope: VariableScope::for_kind(service.kind),
                alias_parent_id: service.id.clone(),
            };
            let created = client.create_alias(&variable.id, &request).await?;
            println!(
                "{} Created alias {} of {}",
                "✓".green().bold(),
                created.key.bold(),
                variable.key
            );
            Ok(())
        }
        VariableCommands::Override {
            command: OverrideCommands::Create { target, key, value },
        } => {
            let service = target_service(&client, config, kind, &target).await?;
            let variable = resolve_variable(&client, &service, &key).await?;
            let request = CreateOverride {
                value,
                override_scope: VariableScope::for_kind(service.kind),
                override_parent_id: service.id.clone(),
            };
            client.create_override(&variable.id, &request).await?;
            println!("{} Overrode {}", "✓".green().bold(), variable.key.bold());
            Ok(())
        }
    }
}

async fn target_service(
    client: &QoveryClient,
    config: &Config,
    kind: ServiceKind,
    target: &VariableTarget,
) -> Result<ServiceHandle> {
    let env = environment_scope(client, &target.scope.input(), &config.context).await?;
    Ok(find_service(client, env.environment_id(), kind, &target.service).await?)
}

fn print_variables(service: &ServiceHandle, variables: &[Variable]) {
    if variables.is_empty() {
        println!("{}", format!("No variables visible from {}.", service.name).yellow());
        return;
    }

    println!(
        "{}",
        format!("{} variable(s) visible from {}:", variables.len(), service.name).bold()
    );
    println!();
    for variable in variables {
        let value = if variable.is_secret {
            "<secret>".dimmed()
        } else {
            variable.value.as_deref().unwrap_or("").normal()
        };
        let origin = match (&variable.aliased_variable, &variable.overridden_variable) {
            (Some(aliased), _) => format!(" (alias of {})", aliased.key),
            (None, Some(overridden)) => format!(" (overrides {})", overridden.key),
            (None, None) => String::new(),
        };
        println!(
            "  {} {}={} {}{}",
            "▸".cyan(),
            variable.key.bold(),
            value,
            format!("[{}]", variable.scope).dimmed(),
            origin.dimmed()
        );
    }
}
