//! Service domain types
//!
//! Applications, containers and jobs share a common handle ([`ServiceHandle`])
//! carrying an exclusive source: either a container image or a Dockerfile
//! built from a git repository.

use serde::{Deserialize, Serialize};

use super::ReferenceObject;
use super::scope::Named;

/// Kind of service addressed by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Application,
    Container,
    /// Any job, cron-scheduled or lifecycle-triggered
    Job,
    Cronjob,
    Lifecycle,
}

impl ServiceKind {
    /// Command-line name of the kind (`qovery <kind> ...`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Application => "application",
            ServiceKind::Container => "container",
            ServiceKind::Job => "job",
            ServiceKind::Cronjob => "cronjob",
            ServiceKind::Lifecycle => "lifecycle",
        }
    }

    /// Plural form used for bulk flags (`--applications`, `--cronjobs`, ...)
    pub fn plural(&self) -> &'static str {
        match self {
            ServiceKind::Application => "applications",
            ServiceKind::Container => "containers",
            ServiceKind::Job => "jobs",
            ServiceKind::Cronjob => "cronjobs",
            ServiceKind::Lifecycle => "lifecycles",
        }
    }

    /// Path segment of the API resource backing this kind
    pub fn api_segment(&self) -> &'static str {
        match self {
            ServiceKind::Application => "application",
            ServiceKind::Container => "container",
            ServiceKind::Job | ServiceKind::Cronjob | ServiceKind::Lifecycle => "job",
        }
    }

    /// Whether the kind is backed by the job resource
    pub fn is_job(&self) -> bool {
        matches!(
            self,
            ServiceKind::Job | ServiceKind::Cronjob | ServiceKind::Lifecycle
        )
    }

    /// Whether a service classified as `actual` satisfies a lookup for `self`
    pub fn accepts(&self, actual: ServiceKind) -> bool {
        match self {
            ServiceKind::Job => actual.is_job(),
            other => *other == actual,
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Git repository a service is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepository {
    pub url: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub root_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_commit_id: Option<String>,
}

/// Container image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    pub image_name: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
}

/// Dockerfile built from a git repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerSource {
    #[serde(default)]
    pub dockerfile_path: Option<String>,
    pub git_repository: GitRepository,
}

/// Where a service's runnable artifact comes from
///
/// Exactly one variant exists per service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSource {
    Image(ImageSource),
    Docker(DockerSource),
}

impl ServiceSource {
    pub fn image(&self) -> Option<&ImageSource> {
        match self {
            ServiceSource::Image(image) => Some(image),
            ServiceSource::Docker(_) => None,
        }
    }

    pub fn docker(&self) -> Option<&DockerSource> {
        match self {
            ServiceSource::Docker(docker) => Some(docker),
            ServiceSource::Image(_) => None,
        }
    }

    /// Human label for error messages
    pub fn label(&self) -> &'static str {
        match self {
            ServiceSource::Image(_) => "image",
            ServiceSource::Docker(_) => "git repository",
        }
    }
}

/// A resolved service of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    pub id: String,
    pub name: String,
    pub kind: ServiceKind,
    pub environment_id: String,
    pub source: ServiceSource,
}

impl Named for ServiceHandle {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Minimal view of a service returned by clone endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: String,
    pub name: String,
}

/// Application built from a git repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub environment: ReferenceObject,
    pub git_repository: GitRepository,
    #[serde(default)]
    pub build_mode: Option<String>,
    #[serde(default)]
    pub dockerfile_path: Option<String>,
    #[serde(default)]
    pub cpu: Option<u32>,
    #[serde(default)]
    pub memory: Option<u32>,
    #[serde(default)]
    pub min_running_instances: Option<u32>,
    #[serde(default)]
    pub max_running_instances: Option<i32>,
    #[serde(default)]
    pub auto_preview: Option<bool>,
}

impl Application {
    pub fn handle(&self) -> ServiceHandle {
        ServiceHandle {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: ServiceKind::Application,
            environment_id: self.environment.id.clone(),
            source: ServiceSource::Docker(DockerSource {
                dockerfile_path: self.dockerfile_path.clone(),
                git_repository: self.git_repository.clone(),
            }),
        }
    }
}

impl Named for Application {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Container deployed from a registry image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub environment: ReferenceObject,
    pub registry: ReferenceObject,
    pub image_name: String,
    pub tag: String,
    #[serde(default)]
    pub cpu: Option<u32>,
    #[serde(default)]
    pub memory: Option<u32>,
    #[serde(default)]
    pub min_running_instances: Option<u32>,
    #[serde(default)]
    pub max_running_instances: Option<i32>,
    #[serde(default)]
    pub auto_preview: Option<bool>,
}

impl Container {
    pub fn handle(&self) -> ServiceHandle {
        ServiceHandle {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: ServiceKind::Container,
            environment_id: self.environment.id.clone(),
            source: ServiceSource::Image(ImageSource {
                image_name: self.image_name.clone(),
                tag: self.tag.clone(),
                registry_id: Some(self.registry.id.clone()),
            }),
        }
    }
}

impl Named for Container {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
