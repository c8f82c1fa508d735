//! Actions on one named service

use qovery_client::PlatformApi;
use qovery_core::domain::service::{ServiceHandle, ServiceKind};
use qovery_core::domain::status::State;
use tracing::info;

use super::{ActionContext, Outcome, VersionFlags, current_version, deploy_request_for};
use crate::error::{CliError, ServiceFailure};
use crate::id_resolver::find_service;
use crate::watch::{wait_for_terminal_state, watch_environment};

/// Deploy a service at the requested version, or its current one
pub async fn deploy_one<A>(
    ctx: &ActionContext<'_, A>,
    kind: ServiceKind,
    name: &str,
    version: &VersionFlags,
) -> Result<Outcome, CliError>
where
    A: PlatformApi + ?Sized,
{
    let requested = version.requested(kind)?;
    let handle = find_service(ctx.api, ctx.environment_id, kind, name).await?;
    let request = deploy_request_for(&handle, requested)?;

    let statuses = ctx.api.get_environment_statuses(ctx.environment_id).await?;
    if statuses.service_state(&handle.id) == Some(State::Deployed)
        && current_version(&handle).as_ref() == Some(&request)
    {
        return Ok(Outcome::Skipped(format!(
            "{} is already up to date ({})",
            handle.name,
            request.version()
        )));
    }

    wait_for_terminal_state(ctx.api, ctx.environment_id, ctx.policy).await?;

    info!("Deploying {} {} at {}", handle.kind, handle.name, request.version());
    ctx.api
        .deploy_service(handle.kind, &handle.id, &request)
        .await?;

    finish(ctx, &handle, State::Unknown).await
}

/// Stop a running service
pub async fn stop_one<A>(
    ctx: &ActionContext<'_, A>,
    kind: ServiceKind,
    name: &str,
) -> Result<Outcome, CliError>
where
    A: PlatformApi + ?Sized,
{
    let handle = find_service(ctx.api, ctx.environment_id, kind, name).await?;

    let statuses = ctx.api.get_environment_statuses(ctx.environment_id).await?;
    if statuses.service_state(&handle.id) == Some(State::Stopped) {
        return Ok(Outcome::Skipped(format!("{} is already stopped", handle.name)));
    }

    wait_for_terminal_state(ctx.api, ctx.environment_id, ctx.policy).await?;

    info!("Stopping {} {}", handle.kind, handle.name);
    ctx.api.stop_service(handle.kind, &handle.id).await?;

    finish(ctx, &handle, State::Unknown).await
}

/// Delete a service
pub async fn delete_one<A>(
    ctx: &ActionContext<'_, A>,
    kind: ServiceKind,
    name: &str,
) -> Result<Outcome, CliError>
where
    A: PlatformApi + ?Sized,
{
    let handle = find_service(ctx.api, ctx.environment_id, kind, name).await?;

    wait_for_terminal_state(ctx.api, ctx.environment_id, ctx.policy).await?;

    info!("Deleting {} {}", handle.kind, handle.name);
    ctx.api.delete_service(handle.kind, &handle.id).await?;

    // A deleted service drops out of the statuses listing
    finish(ctx, &handle, State::Deleted).await
}

/// Redeploy a service at its current version
pub async fn redeploy_one<A>(
    ctx: &ActionContext<'_, A>,
    kind: ServiceKind,
    name: &str,
) -> Result<Outcome, CliError>
where
    A: PlatformApi + ?Sized,
{
    let handle = find_service(ctx.api, ctx.environment_id, kind, name).await?;

    wait_for_terminal_state(ctx.api, ctx.environment_id, ctx.policy).await?;

    info!("Redeploying {} {}", handle.kind, handle.name);
    ctx.api.restart_service(handle.kind, &handle.id).await?;

    finish(ctx, &handle, State::Unknown).await
}

/// Cancel the deployment running on the service's environment
///
/// The platform cancels at environment level; the service name is still
/// resolved so a typo is reported.
pub async fn cancel_one<A>(
    ctx: &ActionContext<'_, A>,
    kind: ServiceKind,
    name: &str,
) -> Result<Outcome, CliError>
where
    A: PlatformApi + ?Sized,
{
    let handle = find_service(ctx.api, ctx.environment_id, kind, name).await?;
    cancel_environment(ctx, Some(&handle)).await
}

/// Cancel the deployment running on the environment
pub async fn cancel_environment<A>(
    ctx: &ActionContext<'_, A>,
    handle: Option<&ServiceHandle>,
) -> Result<Outcome, CliError>
where
    A: PlatformApi + ?Sized,
{
    let status = ctx.api.get_environment_status(ctx.environment_id).await?;
    if status.state.is_terminal() {
        return Ok(Outcome::Skipped(format!(
            "no deployment in progress (environment is {})",
            status.state
        )));
    }

    info!("Cancelling deployment of environment {}", ctx.environment_id);
    ctx.api
        .cancel_environment_deployment(ctx.environment_id)
        .await?;

    if !ctx.watch {
        return Ok(Outcome::InProgress);
    }

    let statuses = watch_environment(ctx.api, ctx.environment_id, ctx.policy).await?;
    let state = handle
        .and_then(|handle| statuses.service_state(&handle.id))
        .unwrap_or(statuses.environment.state);
    Ok(Outcome::Finished(state))
}

/// Watch the environment if asked, then report the service's final state
async fn finish<A>(
    ctx: &ActionContext<'_, A>,
    handle: &ServiceHandle,
    when_missing: State,
) -> Result<Outcome, CliError>
where
    A: PlatformApi + ?Sized,
{
    if !ctx.watch {
        return Ok(Outcome::InProgress);
    }

    let statuses = watch_environment(ctx.api, ctx.environment_id, ctx.policy).await?;
    let state = statuses.service_state(&handle.id).unwrap_or(when_missing);

    if state.is_error() {
        return Err(CliError::ServiceFailures(vec![ServiceFailure {
            name: handle.name.clone(),
            state,
        }]));
    }
    Ok(Outcome::Finished(state))
}
