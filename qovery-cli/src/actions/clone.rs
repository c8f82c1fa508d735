//! Service cloning
//!
//! Applications and containers go through the platform clone endpoint. Jobs
//! are copied field by field into a new job, attached to a deployment stage of
//! the target environment, and given the source's advanced settings. A failure
//! midway leaves the steps already done in place.

use qovery_client::PlatformApi;
use qovery_core::domain::job::classify;
use qovery_core::domain::service::{ServiceKind, ServiceSummary};
use qovery_core::domain::stage::DeploymentStage;
use qovery_core::dto::job::JobRequest;
use qovery_core::dto::service::CloneServiceRequest;
use tracing::{info, warn};

use crate::error::CliError;
use crate::id_resolver::{
    EnvironmentScope, find_job, find_service, resolve_environment, resolve_project,
};
use crate::types::looks_like_id;

/// Where and under which name to clone
#[derive(Debug, Clone, Default)]
pub struct CloneTarget {
    pub project: Option<String>,
    pub environment: Option<String>,
    pub name: Option<String>,
}

/// Clone a service, returning the created one
pub async fn clone_service<A>(
    api: &A,
    source: &EnvironmentScope,
    kind: ServiceKind,
    name: &str,
    target: &CloneTarget,
) -> Result<ServiceSummary, CliError>
where
    A: PlatformApi + ?Sized,
{
    let target_environment_id = target_environment(api, source, target).await?;
    let target_name = target.name.clone().unwrap_or_else(|| name.to_string());

    if target_environment_id == source.environment_id() && target_name == name {
        return Err(CliError::validation(format!(
            "{} '{}' already exists in this environment; pass --target-name",
            kind, name
        )));
    }

    if !kind.is_job() {
        let service = find_service(api, source.environment_id(), kind, name).await?;
        let request = CloneServiceRequest {
            name: target_name,
            environment_id: target_environment_id,
        };
        info!("Cloning {} {} as {}", kind, service.name, request.name);
        return Ok(api.clone_service(kind, &service.id, &request).await?);
    }

    let job = find_job(api, source.environment_id(), kind, name).await?;
    classify(&job)?;

    let request = JobRequest::from_job(&job, &target_name);
    info!("Creating job {} in environment {}", target_name, target_environment_id);
    let created = api.create_job(&target_environment_id, &request).await?;

    let source_stage = api.get_job_deployment_stage(&job.id).await?;
    let stages = if source_stage.environment.id == target_environment_id {
        Vec::new()
    } else {
        api.list_deployment_stages(&target_environment_id).await?
    };
    let stage = select_target_stage(&source_stage, &target_environment_id, &stages)?;
    api.attach_service_to_stage(&stage.id, &created.id).await?;

    let settings = api.get_job_advanced_settings(&job.id).await?;
    api.edit_job_advanced_settings(&created.id, &settings)
        .await?;

    Ok(ServiceSummary {
        id: created.id,
        name: created.name,
    })
}

/// Environment id the clone lands in
///
/// Defaults to the source project, and to an environment named like the
/// source one.
async fn target_environment<A>(
    api: &A,
    source: &EnvironmentScope,
    target: &CloneTarget,
) -> Result<String, CliError>
where
    A: PlatformApi + ?Sized,
{
    if target.project.is_none() && target.environment.is_none() {
        return Ok(source.environment_id().to_string());
    }

    if let Some(environment) = target.environment.as_deref().filter(|env| looks_like_id(env)) {
        return Ok(environment.to_string());
    }

    let project_id = match target.project.as_deref() {
        Some(project) if looks_like_id(project) => project.to_string(),
        Some(project) => {
            let organization_id = match &source.organization_id {
                Some(id) => id.clone(),
                None => api
                    .get_environment(source.environment_id())
                    .await?
                    .organization
                    .map(|org| org.id)
                    .ok_or_else(|| {
                        CliError::validation(
                            "cannot tell the organization of the source environment; pass --target-project as an id",
                        )
                    })?,
            };
            resolve_project(api, &organization_id, project)
                .await?
                .id()
                .to_string()
        }
        None => match &source.project_id {
            Some(id) => id.clone(),
            None => api.get_environment(source.environment_id()).await?.project.id,
        },
    };

    let environment_name = target
        .environment
        .as_deref()
        .unwrap_or_else(|| source.environment.name());
    Ok(resolve_environment(api, &project_id, environment_name)
        .await?
        .id()
        .to_string())
}

/// Stage the clone is attached to
///
/// Same environment keeps the source stage. Otherwise the stage with the same
/// name is used, falling back to the first stage by deployment order.
pub fn select_target_stage(
    source: &DeploymentStage,
    target_environment_id: &str,
    stages: &[DeploymentStage],
) -> Result<DeploymentStage, CliError> {
    if source.environment.id == target_environment_id {
        return Ok(source.clone());
    }

    if let Some(stage) = stages.iter().find(|stage| stage.name == source.name) {
        return Ok(stage.clone());
    }

    let first = stages
        .iter()
        .min_by_key(|stage| stage.deployment_order)
        .ok_or_else(|| {
            CliError::validation(format!(
                "environment {} has no deployment stage",
                target_environment_id
            ))
        })?;

    warn!(
        "No stage named '{}' in target environment, using '{}'",
        source.name, first.name
    );
    Ok(first.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, cronjob, environment, stage};
    use crate::types::ResourceRef;

    fn source_scope() -> EnvironmentScope {
        EnvironmentScope {
            organization_id: Some("org-1".to_string()),
            project_id: Some("proj-1".to_string()),
            environment: ResourceRef::new("env-1", "staging"),
        }
    }

    #[tokio::test]
    async fn test_clone_job_defaults_to_source_environment() {
        let api = FakeApi::new()
            .with_job(cronjob("job-1", "report", "v1"))
            .with_job_stage(stage("stage-1", "jobs", 1, "env-1"));
        let target = CloneTarget {
            name: Some("report-copy".to_string()),
            ..Default::default()
        };

        let created = clone_service(&api, &source_scope(), ServiceKind::Cronjob, "report", &target)
            .await
            .unwrap();

        assert_eq!(created.name, "report-copy");
        assert_eq!(
            api.mutations(),
            vec![
                "create_job env-1 report-copy".to_string(),
                format!("attach_service_to_stage stage-1 {}", created.id),
                format!("edit_job_advanced_settings {}", created.id),
            ]
        );
        assert_eq!(api.count("list_environments"), 0);
    }

    #[tokio::test]
    async fn test_clone_same_name_same_environment_rejected() {
        let api = FakeApi::new().with_job(cronjob("job-1", "report", "v1"));

        let err = clone_service(
            &api,
            &source_scope(),
            ServiceKind::Cronjob,
            "report",
            &CloneTarget::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_clone_into_other_environment_uses_matching_stage() {
        let api = FakeApi::new()
            .with_job(cronjob("job-1", "report", "v1"))
            .with_environment(environment("env-2", "production", "proj-1"))
            .with_job_stage(stage("stage-1", "jobs", 1, "env-1"))
            .with_stages(vec![
                stage("stage-a", "default", 0, "env-2"),
                stage("stage-b", "jobs", 3, "env-2"),
            ]);
        let target = CloneTarget {
            environment: Some("production".to_string()),
            ..Default::default()
        };

        let created = clone_service(&api, &source_scope(), ServiceKind::Cronjob, "report", &target)
            .await
            .unwrap();

        let mutations = api.mutations();
        assert_eq!(mutations[0], "create_job env-2 report");
        assert_eq!(
            mutations[1],
            format!("attach_service_to_stage stage-b {}", created.id)
        );
    }

    #[test]
    fn test_stage_falls_back_to_lowest_order() {
        let source = stage("stage-1", "jobs", 1, "env-1");
        let stages = vec![
            stage("stage-c", "late", 5, "env-2"),
            stage("stage-a", "early", 0, "env-2"),
        ];

        let chosen = select_target_stage(&source, "env-2", &stages).unwrap();
        assert_eq!(chosen.id, "stage-a");
    }

    #[test]
    fn test_stage_same_environment_keeps_source() {
        let source = stage("stage-1", "jobs", 1, "env-1");
        let chosen = select_target_stage(&source, "env-1", &[]).unwrap();
        assert_eq!(chosen, source);
    }

    #[test]
    fn test_stage_requires_target_stages() {
        let source = stage("stage-1", "jobs", 1, "env-1");
        assert!(select_target_stage(&source, "env-2", &[]).is_err());
    }
}
