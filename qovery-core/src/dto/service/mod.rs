//! Service edition and clone DTOs

use serde::{Deserialize, Serialize};

use crate::domain::service::{Application, Container, GitRepository};

/// Request to edit an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationEditRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub git_repository: GitRepository,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_running_instances: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_running_instances: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_preview: Option<bool>,
}

impl From<&Application> for ApplicationEditRequest {
    fn from(app: &Application) -> Self {
        let mut git_repository = app.git_repository.clone();
        git_repository.deployed_commit_id = None;
        Self {
            name: app.name.clone(),
            description: app.description.clone(),
            git_repository,
            build_mode: app.build_mode.clone(),
            dockerfile_path: app.dockerfile_path.clone(),
            cpu: app.cpu,
            memory: app.memory,
            min_running_instances: app.min_running_instances,
            max_running_instances: app.max_running_instances,
            auto_preview: app.auto_preview,
        }
    }
}

/// Request to edit a container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerEditRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub registry_id: String,
    pub image_name: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_running_instances: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_running_instances: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_preview: Option<bool>,
}

impl From<&Container> for ContainerEditRequest {
    fn from(container: &Container) -> Self {
        Self {
            name: container.name.clone(),
            description: container.description.clone(),
            registry_id: container.registry.id.clone(),
            image_name: container.image_name.clone(),
            tag: container.tag.clone(),
            cpu: container.cpu,
            memory: container.memory,
            min_running_instances: container.min_running_instances,
            max_running_instances: container.max_running_instances,
            auto_preview: container.auto_preview,
        }
    }
}

/// Request to clone an application or a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneServiceRequest {
    pub name: String,
    pub environment_id: String,
}
