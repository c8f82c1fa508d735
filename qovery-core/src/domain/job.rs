//! Job domain types and variant classification
//!
//! The platform exposes a single job resource for two behaviours: cronjobs
//! (timer driven) and lifecycle jobs (triggered on environment start, stop or
//! delete). On the wire a job's source carries two optional fields, `image`
//! and `docker`, of which exactly one must be set. [`classify`] turns the raw
//! payload into a [`JobClassification`] and rejects anything else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ReferenceObject;
use super::scope::Named;
use super::service::{DockerSource, ImageSource, ServiceHandle, ServiceKind, ServiceSource};

/// Job as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub environment: ReferenceObject,
    pub cpu: u32,
    pub memory: u32,
    #[serde(default)]
    pub max_nb_restart: Option<u32>,
    #[serde(default)]
    pub max_duration_seconds: Option<u32>,
    #[serde(default)]
    pub auto_preview: Option<bool>,
    #[serde(default)]
    pub port: Option<u16>,
    pub source: JobSource,
    pub schedule: Schedule,
}

/// Raw job source as carried on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<DockerSource>,
}

impl From<ServiceSource> for JobSource {
    fn from(source: ServiceSource) -> Self {
        match source {
            ServiceSource::Image(image) => JobSource {
                image: Some(image),
                docker: None,
            },
            ServiceSource::Docker(docker) => JobSource {
                image: None,
                docker: Some(docker),
            },
        }
    }
}

/// When a job runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub on_start: Option<ScheduleEvent>,
    #[serde(default)]
    pub on_stop: Option<ScheduleEvent>,
    #[serde(default)]
    pub on_delete: Option<ScheduleEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cronjob: Option<CronjobSchedule>,
}

/// Lifecycle trigger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Timer configuration of a cronjob
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronjobSchedule {
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub scheduled_at: String,
}

/// Behavioural variant of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobVariant {
    Cronjob,
    Lifecycle,
}

impl JobVariant {
    pub fn kind(&self) -> ServiceKind {
        match self {
            JobVariant::Cronjob => ServiceKind::Cronjob,
            JobVariant::Lifecycle => ServiceKind::Lifecycle,
        }
    }
}

/// Result of classifying a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobClassification {
    pub variant: JobVariant,
    pub source: ServiceSource,
}

impl JobClassification {
    pub fn is_cronjob(&self) -> bool {
        self.variant == JobVariant::Cronjob
    }

    pub fn image(&self) -> Option<&ImageSource> {
        self.source.image()
    }

    pub fn docker(&self) -> Option<&DockerSource> {
        self.source.docker()
    }
}

/// A job payload breaking the one-source invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("job '{0}' declares both an image and a docker source")]
    BothSources(String),

    #[error("job '{0}' declares neither an image nor a docker source")]
    NoSource(String),
}

/// Variant implied by a schedule: a non-empty cron expression makes a cronjob
pub fn variant_of(schedule: &Schedule) -> JobVariant {
    match &schedule.cronjob {
        Some(cron) if !cron.scheduled_at.trim().is_empty() => JobVariant::Cronjob,
        _ => JobVariant::Lifecycle,
    }
}

/// Classify a job by schedule and source
pub fn classify(job: &Job) -> Result<JobClassification, ClassifyError> {
    let variant = variant_of(&job.schedule);

    let source = match (&job.source.image, &job.source.docker) {
        (Some(image), None) => ServiceSource::Image(image.clone()),
        (None, Some(docker)) => ServiceSource::Docker(docker.clone()),
        (Some(_), Some(_)) => return Err(ClassifyError::BothSources(job.name.clone())),
        (None, None) => return Err(ClassifyError::NoSource(job.name.clone())),
    };

    Ok(JobClassification { variant, source })
}

impl Job {
    /// Classify and wrap the job into a [`ServiceHandle`]
    pub fn handle(&self) -> Result<ServiceHandle, ClassifyError> {
        let classification = classify(self)?;
        Ok(ServiceHandle {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: classification.variant.kind(),
            environment_id: self.environment.id.clone(),
            source: classification.source,
        })
    }
}

impl Named for Job {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
