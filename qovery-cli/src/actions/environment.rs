//! Actions on a whole environment

use qovery_client::ScopeApi;
use qovery_core::domain::status::EnvironmentStatuses;
use tracing::info;

use super::{ActionContext, Outcome};
use crate::error::{CliError, ServiceFailure};
use crate::watch::{wait_for_terminal_state, watch_environment};

/// Environment-wide action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentAction {
    Deploy,
    Stop,
}

impl EnvironmentAction {
    pub fn verb(&self) -> &'static str {
        match self {
            EnvironmentAction::Deploy => "deploy",
            EnvironmentAction::Stop => "stop",
        }
    }
}

/// Deploy or stop every service of the environment
///
/// In watch mode an environment ending in an error state fails with every
/// service that ended in error.
pub async fn run_environment_action<A>(
    ctx: &ActionContext<'_, A>,
    action: EnvironmentAction,
) -> Result<Outcome, CliError>
where
    A: ScopeApi + ?Sized,
{
    wait_for_terminal_state(ctx.api, ctx.environment_id, ctx.policy).await?;

    info!("Running {} on environment {}", action.verb(), ctx.environment_id);
    match action {
        EnvironmentAction::Deploy => ctx.api.deploy_environment(ctx.environment_id).await?,
        EnvironmentAction::Stop => ctx.api.stop_environment(ctx.environment_id).await?,
    }

    if !ctx.watch {
        return Ok(Outcome::InProgress);
    }

    let statuses = watch_environment(ctx.api, ctx.environment_id, ctx.policy).await?;
    ensure_settled(ctx.environment_id, &statuses)?;
    Ok(Outcome::Finished(statuses.environment.state))
}

fn ensure_settled(environment_id: &str, statuses: &EnvironmentStatuses) -> Result<(), CliError> {
    let state = statuses.environment.state;
    if !state.is_error() {
        return Ok(());
    }

    let services = statuses
        .services()
        .filter(|service| service.state.is_error())
        .map(|service| ServiceFailure {
            name: service.id.clone(),
            state: service.state,
        })
        .collect();

    Err(CliError::EnvironmentFailed {
        environment_id: environment_id.to_string(),
        state,
        services,
    })
}
