//! Deploy, stop and delete DTOs

use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceKind;

/// Version to deploy for a single service
///
/// Serializes as `{"git_commit_id": "..."}` or `{"image_tag": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployRequest {
    GitCommitId(String),
    ImageTag(String),
}

impl DeployRequest {
    pub fn git_commit_id(&self) -> Option<&str> {
        match self {
            DeployRequest::GitCommitId(commit) => Some(commit),
            DeployRequest::ImageTag(_) => None,
        }
    }

    pub fn image_tag(&self) -> Option<&str> {
        match self {
            DeployRequest::ImageTag(tag) => Some(tag),
            DeployRequest::GitCommitId(_) => None,
        }
    }

    /// The version string, whichever kind it is
    pub fn version(&self) -> &str {
        match self {
            DeployRequest::GitCommitId(v) | DeployRequest::ImageTag(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDeploy {
    pub application_id: String,
    pub git_commit_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDeploy {
    pub id: String,
    pub image_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDeploy {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit_id: Option<String>,
}

/// Deploy several services of one environment in a single call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeployRequest {
    #[serde(default)]
    pub applications: Vec<ApplicationDeploy>,
    #[serde(default)]
    pub containers: Vec<ContainerDeploy>,
    #[serde(default)]
    pub jobs: Vec<JobDeploy>,
}

impl BulkDeployRequest {
    /// Add a service with the version it should be deployed at
    pub fn push(&mut self, kind: ServiceKind, id: &str, request: DeployRequest) {
        match kind {
            ServiceKind::Application => self.applications.push(ApplicationDeploy {
                application_id: id.to_string(),
                git_commit_id: request.version().to_string(),
            }),
            ServiceKind::Container => self.containers.push(ContainerDeploy {
                id: id.to_string(),
                image_tag: request.version().to_string(),
            }),
            ServiceKind::Job | ServiceKind::Cronjob | ServiceKind::Lifecycle => {
                self.jobs.push(JobDeploy {
                    id: id.to_string(),
                    image_tag: request.image_tag().map(str::to_string),
                    git_commit_id: request.git_commit_id().map(str::to_string),
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.applications.len() + self.containers.len() + self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Service ids targeted by a batched stop or delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIds {
    #[serde(default)]
    pub application_ids: Vec<String>,
    #[serde(default)]
    pub container_ids: Vec<String>,
    #[serde(default)]
    pub job_ids: Vec<String>,
}

impl ServiceIds {
    pub fn push(&mut self, kind: ServiceKind, id: &str) {
        let bucket = match kind {
            ServiceKind::Application => &mut self.application_ids,
            ServiceKind::Container => &mut self.container_ids,
            ServiceKind::Job | ServiceKind::Cronjob | ServiceKind::Lifecycle => &mut self.job_ids,
        };
        bucket.push(id.to_string());
    }

    pub fn len(&self) -> usize {
        self.application_ids.len() + self.container_ids.len() + self.job_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
