//! Organization and project listing

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use qovery_client::{QoveryClient, ScopeApi};

use super::print_json;
use crate::config::Config;
use crate::id_resolver::{ScopeInput, organization_scope};

/// Organization subcommands
#[derive(Subcommand)]
pub enum OrganizationCommands {
    /// List organizations the token can access
    List {
        #[arg(long)]
        json: bool,
    },
}

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects of an organization
    List {
        /// Organization name or id (defaults to the context)
        #[arg(long)]
        organization: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_organization_command(
    client: &QoveryClient,
    command: OrganizationCommands,
) -> Result<()> {
    match command {
        OrganizationCommands::List { json } => {
            let organizations = client.list_organizations().await?;
            if json {
                return print_json(&organizations);
            }
            if organizations.is_empty() {
                println!("{}", "No organizations found.".yellow());
                return Ok(());
            }
            println!("{}", format!("Found {} organization(s):", organizations.len()).bold());
            println!();
            for org in organizations {
                println!("  {} {} {}", "▸".cyan(), org.name.bold(), org.id.dimmed());
            }
            Ok(())
        }
    }
}

pub async fn handle_project_command(
    client: &QoveryClient,
    config: &Config,
    command: ProjectCommands,
) -> Result<()> {
    match command {
        ProjectCommands::List { organization, json } => {
            let input = ScopeInput {
                organization: organization.as_deref(),
                ..Default::default()
            };
            let organization_id = organization_scope(client, &input, &config.context).await?;
            let projects = client.list_projects(&organization_id).await?;

            if json {
                return print_json(&projects);
            }
            if projects.is_empty() {
                println!("{}", "No projects found.".yellow());
                return Ok(());
            }
            println!("{}", format!("Found {} project(s):", projects.len()).bold());
            println!();
            for project in projects {
                println!("  {} {} {}", "▸".cyan(), project.name.bold(), project.id.dimmed());
            }
            Ok(())
        }
    }
}
