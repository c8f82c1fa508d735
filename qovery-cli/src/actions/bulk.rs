//! Batched actions over several services of one kind

use qovery_client::PlatformApi;
use qovery_core::domain::service::{ServiceHandle, ServiceKind};
use qovery_core::domain::status::State;
use qovery_core::dto::deploy::{BulkDeployRequest, ServiceIds};
use tracing::info;

use super::{ActionContext, VersionFlags, dedup_names, deploy_request_for};
use crate::error::{CliError, ServiceFailure};
use crate::id_resolver::find_services;
use crate::watch::{wait_for_terminal_state, watch_environment};

/// Action applied to every listed service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Deploy(VersionFlags),
    Stop,
    Delete,
}

impl BulkAction {
    pub fn verb(&self) -> &'static str {
        match self {
            BulkAction::Deploy(_) => "deploy",
            BulkAction::Stop => "stop",
            BulkAction::Delete => "delete",
        }
    }
}

/// Services targeted by a batched call, with their final state when watched
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub services: Vec<ServiceHandle>,
    pub final_states: Option<Vec<(String, State)>>,
}

impl BulkOutcome {
    /// Watched services that ended in an error state
    pub fn failures(&self) -> Vec<ServiceFailure> {
        self.final_states
            .iter()
            .flatten()
            .filter(|(_, state)| state.is_error())
            .map(|(name, state)| ServiceFailure {
                name: name.clone(),
                state: *state,
            })
            .collect()
    }

    /// Turn error states into an error naming every failed service
    pub fn ensure_success(&self) -> Result<(), CliError> {
        let failures = self.failures();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CliError::ServiceFailures(failures))
        }
    }
}

enum Payload {
    Deploy(BulkDeployRequest),
    Stop(ServiceIds),
    Delete(ServiceIds),
}

/// Resolve every name, then trigger one batched call
///
/// Nothing is sent unless every name resolves. Repeated names are sent once.
pub async fn dispatch_bulk<A>(
    ctx: &ActionContext<'_, A>,
    kind: ServiceKind,
    action: &BulkAction,
    names: Vec<String>,
) -> Result<BulkOutcome, CliError>
where
    A: PlatformApi + ?Sized,
{
    let requested = match action {
        BulkAction::Deploy(version) => version.requested(kind)?,
        BulkAction::Stop | BulkAction::Delete => None,
    };

    let names = dedup_names(names);
    let services = find_services(ctx.api, ctx.environment_id, kind, &names).await?;

    let payload = match action {
        BulkAction::Deploy(_) => {
            let mut request = BulkDeployRequest::default();
            for service in &services {
                let version = deploy_request_for(service, requested.clone())?;
                request.push(service.kind, &service.id, version);
            }
            Payload::Deploy(request)
        }
        BulkAction::Stop | BulkAction::Delete => {
            let mut ids = ServiceIds::default();
            for service in &services {
                ids.push(service.kind, &service.id);
            }
            if *action == BulkAction::Stop {
                Payload::Stop(ids)
            } else {
                Payload::Delete(ids)
            }
        }
    };

    wait_for_terminal_state(ctx.api, ctx.environment_id, ctx.policy).await?;

    info!(
        "Sending batched {} for {} {}",
        action.verb(),
        services.len(),
        kind.plural()
    );
    match &payload {
        Payload::Deploy(request) => ctx.api.deploy_services(ctx.environment_id, request).await?,
        Payload::Stop(ids) => ctx.api.stop_services(ctx.environment_id, ids).await?,
        Payload::Delete(ids) => ctx.api.delete_services(ctx.environment_id, ids).await?,
    }

    if !ctx.watch {
        return Ok(BulkOutcome {
            services,
            final_states: None,
        });
    }

    let when_missing = match action {
        BulkAction::Delete => State::Deleted,
        _ => State::Unknown,
    };
    let statuses = watch_environment(ctx.api, ctx.environment_id, ctx.policy).await?;
    let final_states = services
        .iter()
        .map(|service| {
            let state = statuses.service_state(&service.id).unwrap_or(when_missing);
            (service.name.clone(), state)
        })
        .collect();

    Ok(BulkOutcome {
        services,
        final_states: Some(final_states),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, cronjob, docker_lifecycle, image_lifecycle};
    use crate::watch::WaitPolicy;
    use std::time::Duration;

    fn ctx(api: &FakeApi, watch: bool) -> ActionContext<'_, FakeApi> {
        ActionContext {
            api,
            environment_id: "env-1",
            policy: WaitPolicy::new(Duration::ZERO, Duration::from_secs(60)),
            watch,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn test_delete_lifecycles_with_watch() {
        let api = FakeApi::new()
            .with_job(image_lifecycle("job-a", "a"))
            .with_job(image_lifecycle("job-b", "b"))
            .with_env_states(&[State::Deployed, State::Deleting, State::Deleting, State::Ready]);

        let outcome = dispatch_bulk(
            &ctx(&api, true),
            ServiceKind::Lifecycle,
            &BulkAction::Delete,
            names(&["a", "b"]),
        )
        .await
        .unwrap();

        assert_eq!(
            api.mutations(),
            vec![
                r#"delete_services env-1 {"application_ids":[],"container_ids":[],"job_ids":["job-a","job-b"]}"#
            ]
        );
        assert_eq!(api.count("get_environment_status"), 4);
        assert_eq!(
            outcome.final_states.unwrap(),
            vec![
                ("a".to_string(), State::Deleted),
                ("b".to_string(), State::Deleted)
            ]
        );
    }

    #[tokio::test]
    async fn test_unresolved_name_aborts_before_any_mutation() {
        let api = FakeApi::new().with_job(image_lifecycle("job-a", "a"));

        let err = dispatch_bulk(
            &ctx(&api, false),
            ServiceKind::Lifecycle,
            &BulkAction::Stop,
            names(&["a", "nope", "gone"]),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "lifecycles not found: nope, gone");
        assert!(api.mutations().is_empty());
        assert_eq!(api.count("get_environment_status"), 0);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_sent_once() {
        let api = FakeApi::new()
            .with_job(cronjob("job-a", "a", "v1"))
            .with_job(cronjob("job-b", "b", "v1"));

        let outcome = dispatch_bulk(
            &ctx(&api, false),
            ServiceKind::Cronjob,
            &BulkAction::Stop,
            names(&["a", "b", "a"]),
        )
        .await
        .unwrap();

        assert_eq!(outcome.services.len(), 2);
        assert_eq!(
            api.mutations(),
            vec![
                r#"stop_services env-1 {"application_ids":[],"container_ids":[],"job_ids":["job-a","job-b"]}"#
            ]
        );
    }

    #[tokio::test]
    async fn test_bulk_deploy_uses_each_current_version() {
        let api = FakeApi::new()
            .with_job(image_lifecycle("job-a", "a"))
            .with_job(docker_lifecycle("job-b", "b", "abc"));

        dispatch_bulk(
            &ctx(&api, false),
            ServiceKind::Lifecycle,
            &BulkAction::Deploy(VersionFlags::default()),
            names(&["a", "b"]),
        )
        .await
        .unwrap();

        assert_eq!(
            api.mutations(),
            vec![
                r#"deploy_services env-1 {"applications":[],"containers":[],"jobs":[{"id":"job-a","image_tag":"latest"},{"id":"job-b","git_commit_id":"abc"}]}"#
            ]
        );
    }

    #[tokio::test]
    async fn test_bulk_deploy_rejects_tag_on_mixed_sources() {
        let api = FakeApi::new()
            .with_job(image_lifecycle("job-a", "a"))
            .with_job(docker_lifecycle("job-b", "b", "abc"));
        let version = VersionFlags {
            tag: Some("v2".to_string()),
            commit_id: None,
        };

        let err = dispatch_bulk(
            &ctx(&api, false),
            ServiceKind::Lifecycle,
            &BulkAction::Deploy(version),
            names(&["a", "b"]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_watch_failures_name_every_service() {
        let api = FakeApi::new()
            .with_job(cronjob("job-a", "a", "v1"))
            .with_job(cronjob("job-b", "b", "v1"))
            .with_service_state("job-a", State::Deployed)
            .with_service_state("job-b", State::DeploymentError);

        let outcome = dispatch_bulk(
            &ctx(&api, true),
            ServiceKind::Cronjob,
            &BulkAction::Deploy(VersionFlags::default()),
            names(&["a", "b"]),
        )
        .await
        .unwrap();

        let failures = outcome.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "b");
        assert!(outcome.ensure_success().is_err());
    }
}
