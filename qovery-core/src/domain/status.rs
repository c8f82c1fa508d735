//! Deployment status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deployment state reported for an environment or a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    Ready,
    Queued,
    DeploymentQueued,
    Building,
    BuildQueued,
    BuildError,
    Deploying,
    Deployed,
    DeploymentError,
    StopQueued,
    Stopping,
    Stopped,
    StopError,
    RestartQueued,
    Restarting,
    Restarted,
    RestartError,
    DeleteQueued,
    Deleting,
    Deleted,
    DeleteError,
    Canceling,
    Canceled,
    WaitingRunning,
    WaitingStopping,
    WaitingDeleting,
    #[serde(other)]
    Unknown,
}

impl State {
    /// No further transition happens without a new user action
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            State::Ready
                | State::Deployed
                | State::Stopped
                | State::Restarted
                | State::Deleted
                | State::Canceled
        ) || self.is_error()
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            State::BuildError
                | State::DeploymentError
                | State::StopError
                | State::RestartError
                | State::DeleteError
        )
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let raw = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "UNKNOWN".to_string());
        write!(f, "{}", raw)
    }
}

/// Status of an environment as a whole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentStatus {
    pub id: String,
    pub state: State,
    #[serde(default)]
    pub last_deployment_state: Option<State>,
    #[serde(default)]
    pub last_deployment_date: Option<DateTime<Utc>>,
}

/// Status of a single service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub id: String,
    pub state: State,
    #[serde(default)]
    pub message: Option<String>,
}

/// Environment status with per-service statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentStatuses {
    pub environment: EnvironmentStatus,
    #[serde(default)]
    pub applications: Vec<ServiceStatus>,
    #[serde(default)]
    pub containers: Vec<ServiceStatus>,
    #[serde(default)]
    pub jobs: Vec<ServiceStatus>,
    #[serde(default)]
    pub helms: Vec<ServiceStatus>,
    #[serde(default)]
    pub databases: Vec<ServiceStatus>,
}

impl EnvironmentStatuses {
    /// All service statuses regardless of kind
    pub fn services(&self) -> impl Iterator<Item = &ServiceStatus> {
        self.applications
            .iter()
            .chain(&self.containers)
            .chain(&self.jobs)
            .chain(&self.helms)
            .chain(&self.databases)
    }

    /// State of the service with the given id
    pub fn service_state(&self, service_id: &str) -> Option<State> {
        self.services()
            .find(|s| s.id == service_id)
            .map(|s| s.state)
    }
}
