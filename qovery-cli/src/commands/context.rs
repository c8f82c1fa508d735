//! Context command handlers
//!
//! The context file stores the token and the default organization, project
//! and environment used when scope flags are omitted.

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::*;
use qovery_client::ScopeApi;

use super::ScopeArgs;
use crate::config::{Config, Context};
use crate::error::CliError;
use crate::id_resolver::{resolve_environment, resolve_organization, resolve_project};

/// Context subcommands
#[derive(Subcommand)]
pub enum ContextCommands {
    /// Show the current context
    Show,
    /// Select a default organization, project and environment
    Set {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Also store the token in use
        #[arg(long)]
        save_token: bool,
    },
}

/// Handle context commands
pub async fn handle_context_command(command: ContextCommands, config: &mut Config) -> Result<()> {
    match command {
        ContextCommands::Show => {
            show(&config.context, config);
            Ok(())
        }
        ContextCommands::Set { scope, save_token } => {
            if scope.organization.is_none()
                && scope.project.is_none()
                && scope.environment.is_none()
                && !save_token
            {
                return Err(CliError::validation(
                    "nothing to set: pass --organization, --project, --environment or --save-token",
                )
                .into());
            }

            let client = config.client()?;
            let context = select(&client, &config.context, &scope).await?;
            config.context = context;

            if save_token {
                let credentials = config.credentials()?;
                config.context.access_token = Some(credentials.token);
                config.context.token_type = Some(credentials.token_type);
            }

            config
                .save_context()
                .context("Failed to save the context")?;
            println!(
                "{} Context saved to {}",
                "✓".green().bold(),
                config.context_path.display()
            );
            show(&config.context, config);
            Ok(())
        }
    }
}

/// Apply the selected scope on top of the current context
///
/// Changing a parent clears its descendants.
async fn select<A>(api: &A, current: &Context, scope: &ScopeArgs) -> Result<Context, CliError>
where
    A: ScopeApi + ?Sized,
{
    let mut context = current.clone();

    if let Some(organization) = &scope.organization {
        let org = resolve_organization(api, organization).await?;
        context.organization_id = Some(org.id().to_string());
        context.organization_name = Some(org.name().to_string());
        context.project_id = None;
        context.project_name = None;
        context.environment_id = None;
        context.environment_name = None;
    }

    if let Some(project) = &scope.project {
        let organization_id = context.organization_id.clone().ok_or_else(|| {
            CliError::validation("select an organization first with --organization")
        })?;
        let project = resolve_project(api, &organization_id, project).await?;
        context.project_id = Some(project.id().to_string());
        context.project_name = Some(project.name().to_string());
        context.environment_id = None;
        context.environment_name = None;
    }

    if let Some(environment) = &scope.environment {
        let project_id = context
            .project_id
            .clone()
            .ok_or_else(|| CliError::validation("select a project first with --project"))?;
        let environment = resolve_environment(api, &project_id, environment).await?;
        context.environment_id = Some(environment.id().to_string());
        context.environment_name = Some(environment.name().to_string());
    }

    Ok(context)
}

fn show(context: &Context, config: &Config) {
    let line = |label: &str, name: &Option<String>, id: &Option<String>| match (name, id) {
        (_, None) => println!("  {:<13} {}", label, "-".dimmed()),
        (Some(name), Some(id)) => println!("  {:<13} {} {}", label, name.bold(), id.dimmed()),
        (None, Some(id)) => println!("  {:<13} {}", label, id),
    };

    println!("{}", "Current context:".bold());
    line("Organization:", &context.organization_name, &context.organization_id);
    line("Project:", &context.project_name, &context.project_id);
    line("Environment:", &context.environment_name, &context.environment_id);
    let token = if config.token.is_some() || context.access_token.is_some() {
        "set".green()
    } else {
        "missing".red()
    };
    println!("  {:<13} {}", "Token:", token);
}
