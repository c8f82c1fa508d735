//! In-place update of a service's source: git branch, image name or tag

use qovery_client::PlatformApi;
use qovery_core::domain::job::classify;
use qovery_core::domain::service::{ServiceKind, ServiceSource, ServiceSummary};
use qovery_core::dto::job::JobRequest;
use qovery_core::dto::service::{ApplicationEditRequest, ContainerEditRequest};
use tracing::info;

use crate::error::CliError;
use crate::id_resolver::{find_application, find_container, find_job};

/// `--branch`, `--tag` and `--image-name` as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateFlags {
    pub branch: Option<String>,
    pub tag: Option<String>,
    pub image_name: Option<String>,
}

impl UpdateFlags {
    fn touches_image(&self) -> bool {
        self.tag.is_some() || self.image_name.is_some()
    }

    /// Checks that need no API call
    pub fn validate(&self, kind: ServiceKind) -> Result<(), CliError> {
        if self.branch.is_none() && !self.touches_image() {
            return Err(CliError::validation(
                "nothing to update: pass --branch, --tag or --image-name",
            ));
        }
        if self.branch.is_some() && self.touches_image() {
            return Err(CliError::validation(
                "--branch cannot be combined with --tag or --image-name",
            ));
        }
        match kind {
            ServiceKind::Application if self.touches_image() => Err(CliError::validation(
                "applications are built from git; only --branch applies",
            )),
            ServiceKind::Container if self.branch.is_some() => Err(CliError::validation(
                "containers run from an image; use --tag or --image-name",
            )),
            _ => Ok(()),
        }
    }

    /// Checks against the source of a resolved job
    fn check_source(&self, name: &str, source: &ServiceSource) -> Result<(), CliError> {
        match source {
            ServiceSource::Image(_) if self.branch.is_some() => Err(CliError::validation(format!(
                "{} runs from an image; --branch only applies to git-built jobs",
                name
            ))),
            ServiceSource::Docker(_) if self.touches_image() => {
                Err(CliError::validation(format!(
                    "{} is built from a git repository; --tag and --image-name only apply to image jobs",
                    name
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Update a service's source in place
pub async fn update_service<A>(
    api: &A,
    environment_id: &str,
    kind: ServiceKind,
    name: &str,
    flags: &UpdateFlags,
) -> Result<ServiceSummary, CliError>
where
    A: PlatformApi + ?Sized,
{
    flags.validate(kind)?;

    match kind {
        ServiceKind::Application => {
            let application = find_application(api, environment_id, name).await?;
            let mut request = ApplicationEditRequest::from(&application);
            request.git_repository.branch = flags.branch.clone();

            info!("Updating application {}", application.name);
            let updated = api.edit_application(&application.id, &request).await?;
            Ok(ServiceSummary {
                id: updated.id,
                name: updated.name,
            })
        }
        ServiceKind::Container => {
            let container = find_container(api, environment_id, name).await?;
            let mut request = ContainerEditRequest::from(&container);
            if let Some(tag) = &flags.tag {
                request.tag = tag.clone();
            }
            if let Some(image_name) = &flags.image_name {
                request.image_name = image_name.clone();
            }

            info!("Updating container {}", container.name);
            let updated = api.edit_container(&container.id, &request).await?;
            Ok(ServiceSummary {
                id: updated.id,
                name: updated.name,
            })
        }
        ServiceKind::Job | ServiceKind::Cronjob | ServiceKind::Lifecycle => {
            let job = find_job(api, environment_id, kind, name).await?;
            let classification = classify(&job)?;
            flags.check_source(&job.name, &classification.source)?;

            let mut request = JobRequest::from_job(&job, &job.name);
            if let Some(image) = request.source.image.as_mut() {
                if let Some(tag) = &flags.tag {
                    image.tag = tag.clone();
                }
                if let Some(image_name) = &flags.image_name {
                    image.image_name = image_name.clone();
                }
            }
            if let Some(docker) = request.source.docker.as_mut() {
                if let Some(branch) = &flags.branch {
                    docker.git_repository.branch = Some(branch.clone());
                }
            }

            info!("Updating job {}", job.name);
            let updated = api.edit_job(&job.id, &request).await?;
            Ok(ServiceSummary {
                id: updated.id,
                name: updated.name,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, cronjob, docker_lifecycle};

    fn branch(name: &str) -> UpdateFlags {
        UpdateFlags {
            branch: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_flag_combinations() {
        assert!(UpdateFlags::default().validate(ServiceKind::Job).is_err());

        let mixed = UpdateFlags {
            branch: Some("main".to_string()),
            tag: Some("v2".to_string()),
            image_name: None,
        };
        assert!(mixed.validate(ServiceKind::Job).is_err());

        assert!(branch("main").validate(ServiceKind::Container).is_err());
        assert!(branch("main").validate(ServiceKind::Application).is_ok());
    }

    #[tokio::test]
    async fn test_branch_on_image_job_rejected_before_edit() {
        let api = FakeApi::new().with_job(cronjob("job-1", "report", "v1"));

        let err = update_service(&api, "env-1", ServiceKind::Cronjob, "report", &branch("dev"))
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Validation(msg) if msg.contains("image")));
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_update_tag_of_image_job() {
        let api = FakeApi::new().with_job(cronjob("job-1", "report", "v1"));
        let flags = UpdateFlags {
            tag: Some("v3".to_string()),
            ..Default::default()
        };

        update_service(&api, "env-1", ServiceKind::Cronjob, "report", &flags)
            .await
            .unwrap();

        assert_eq!(api.mutations(), vec!["edit_job job-1 report"]);
        let edited = api.edited_jobs();
        assert_eq!(edited[0].source.image.as_ref().unwrap().tag, "v3");
    }

    #[tokio::test]
    async fn test_update_branch_of_git_job() {
        let api = FakeApi::new().with_job(docker_lifecycle("job-1", "migrate", "abc"));

        update_service(&api, "env-1", ServiceKind::Lifecycle, "migrate", &branch("dev"))
            .await
            .unwrap();

        let edited = api.edited_jobs();
        let repository = &edited[0].source.docker.as_ref().unwrap().git_repository;
        assert_eq!(repository.branch.as_deref(), Some("dev"));
        assert!(repository.deployed_commit_id.is_none());
    }
}
