//! Commands module
//!
//! Defines all CLI commands and their handlers.
//!
//! The five service kinds share one [`ServiceCommands`] definition. Its target
//! flags are declared as `--service`/`--services` and renamed per kind by
//! [`with_service_flag_names`], so `qovery cronjob deploy` takes `--cronjob`
//! and `--cronjobs`.

mod context;
mod environment;
mod scope;
mod service;
mod variable;

pub use context::ContextCommands;
pub use environment::EnvironmentCommands;
pub use scope::{OrganizationCommands, ProjectCommands};
pub use service::ServiceCommands;
pub use variable::VariableCommands;

use anyhow::Result;
use clap::{Args, Command, Subcommand};
use qovery_core::domain::service::ServiceKind;

use crate::config::Config;
use crate::id_resolver::ScopeInput;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Organization management
    Organization {
        #[command(subcommand)]
        command: OrganizationCommands,
    },
    /// Project management
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Environment management
    Environment {
        #[command(subcommand)]
        command: EnvironmentCommands,
    },
    /// Default organization, project and environment
    Context {
        #[command(subcommand)]
        command: ContextCommands,
    },
    /// Application management
    Application {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Container management
    Container {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Job management, cronjobs and lifecycle jobs alike
    Job {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Cronjob management
    Cronjob {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Lifecycle job management
    Lifecycle {
        #[command(subcommand)]
        command: ServiceCommands,
    },
}

/// Organization, project and environment selection
#[derive(Debug, Clone, Default, Args)]
pub struct ScopeArgs {
    /// Organization name or id (defaults to the context)
    #[arg(long)]
    pub organization: Option<String>,

    /// Project name or id (defaults to the context)
    #[arg(long)]
    pub project: Option<String>,

    /// Environment name or id (defaults to the context)
    #[arg(long)]
    pub environment: Option<String>,
}

impl ScopeArgs {
    pub fn input(&self) -> ScopeInput<'_> {
        ScopeInput {
            organization: self.organization.as_deref(),
            project: self.project.as_deref(),
            environment: self.environment.as_deref(),
        }
    }
}

const SERVICE_KINDS: [ServiceKind; 5] = [
    ServiceKind::Application,
    ServiceKind::Container,
    ServiceKind::Job,
    ServiceKind::Cronjob,
    ServiceKind::Lifecycle,
];

/// Rename `--service`/`--services` after the kind of each service subcommand
pub fn with_service_flag_names(mut cli: Command) -> Command {
    for kind in SERVICE_KINDS {
        cli = cli.mut_subcommand(kind.as_str(), |command| rename_service_flags(command, kind));
    }
    cli
}

fn rename_service_flags(mut command: Command, kind: ServiceKind) -> Command {
    let has = |command: &Command, id: &str| command.get_arguments().any(|arg| arg.get_id() == id);

    if has(&command, "service") {
        command = command.mut_arg("service", |arg| {
            arg.long(kind.as_str())
                .value_name("NAME")
                .help(format!("Name of the {}", kind))
        });
    }
    if has(&command, "services") {
        command = command.mut_arg("services", |arg| {
            arg.long(kind.plural())
                .value_name("NAMES")
                .help(format!("Comma-separated {} names", kind))
        });
    }

    let children: Vec<String> = command
        .get_subcommands()
        .map(|sub| sub.get_name().to_string())
        .collect();
    for child in children {
        command = command.mut_subcommand(child, |sub| rename_service_flags(sub, kind));
    }
    command
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &mut Config) -> Result<()> {
    let (kind, command) = match command {
        Commands::Context { command } => {
            return context::handle_context_command(command, config).await;
        }
        Commands::Organization { command } => {
            let client = config.client()?;
            return scope::handle_organization_command(&client, command).await;
        }
        Commands::Project { command } => {
            let client = config.client()?;
            return scope::handle_project_command(&client, config, command).await;
        }
        Commands::Environment { command } => {
            let client = config.client()?;
            return environment::handle_environment_command(&client, config, command).await;
        }
        Commands::Application { command } => (ServiceKind::Application, command),
        Commands::Container { command } => (ServiceKind::Container, command),
        Commands::Job { command } => (ServiceKind::Job, command),
        Commands::Cronjob { command } => (ServiceKind::Cronjob, command),
        Commands::Lifecycle { command } => (ServiceKind::Lifecycle, command),
    };

    service::handle_service_command(config, kind, command).await
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
