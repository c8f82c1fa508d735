//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::{Job, JobSource, Schedule};

/// Request to create or edit a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cpu: u32,
    pub memory: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nb_restart: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub source: JobSource,
    pub schedule: Schedule,
}

impl JobRequest {
    /// Copy every editable field of an existing job under a (possibly new) name
    pub fn from_job(job: &Job, name: impl Into<String>) -> Self {
        let mut source = job.source.clone();
        if let Some(docker) = source.docker.as_mut() {
            docker.git_repository.deployed_commit_id = None;
        }

        Self {
            name: name.into(),
            description: job.description.clone(),
            cpu: job.cpu,
            memory: job.memory,
            max_nb_restart: job.max_nb_restart,
            max_duration_seconds: job.max_duration_seconds,
            auto_preview: job.auto_preview,
            port: job.port,
            source,
            schedule: job.schedule.clone(),
        }
    }
}
