//! CLI error taxonomy
//!
//! Every variant is terminal for the running command. The top-level handler
//! in `main` prints the message, an optional hint, and exits with code 1.

use std::time::Duration;

use qovery_client::ClientError;
use qovery_core::domain::job::ClassifyError;
use qovery_core::domain::service::ServiceKind;
use qovery_core::domain::status::State;
use thiserror::Error;

use crate::types::ResourceKind;

const UNAUTHORIZED_HINT: &str = "check the access token (--token or QOVERY_CLI_ACCESS_TOKEN)";

/// A service that ended in an error state after a watched action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    pub name: String,
    pub state: State,
}

impl std::fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.state)
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    /// Name resolution miss
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    /// Several names of a bulk target list could not be resolved
    #[error("{} not found: {}", kind.plural(), names.join(", "))]
    Unresolved { kind: ServiceKind, names: Vec<String> },

    /// Missing or mutually exclusive flags
    #[error("{0}")]
    Validation(String),

    /// The API rejected a request or could not be reached
    #[error(transparent)]
    Api(#[from] ClientError),

    #[error(
        "timed out after {}s waiting for environment {environment_id} to reach a terminal state",
        waited.as_secs()
    )]
    Timeout {
        environment_id: String,
        waited: Duration,
    },

    /// A resource payload broke a model invariant
    #[error(transparent)]
    Invariant(#[from] ClassifyError),

    /// Watched services that ended in an error state
    #[error(
        "{} service(s) failed: {}",
        .0.len(),
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    ServiceFailures(Vec<ServiceFailure>),

    /// A watched environment action ended in an error state
    #[error("environment {environment_id} ended in {state}{}", failed_services(.services))]
    EnvironmentFailed {
        environment_id: String,
        state: State,
        services: Vec<ServiceFailure>,
    },
}

fn failed_services(services: &[ServiceFailure]) -> String {
    if services.is_empty() {
        return String::new();
    }
    let names: Vec<String> = services.iter().map(ToString::to_string).collect();
    format!("; failed services: {}", names.join(", "))
}

impl CliError {
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::Validation(message.into())
    }

    /// Follow-up line printed under the error message
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::NotFound { kind, .. } => Some(format!(
                "run `{}` to see what is available",
                kind.list_command()
            )),
            CliError::Unresolved { kind, .. } => Some(format!(
                "run `{}` to see what is available",
                ResourceKind::Service(*kind).list_command()
            )),
            CliError::Api(err) if err.is_unauthorized() => Some(UNAUTHORIZED_HINT.to_string()),
            CliError::Timeout { .. } => {
                Some("raise --max-wait-secs to wait longer".to_string())
            }
            _ => None,
        }
    }
}

/// Hint for any error reaching the top-level handler
pub fn hint_for(err: &anyhow::Error) -> Option<String> {
    if let Some(err) = err.downcast_ref::<CliError>() {
        return err.hint();
    }
    match err.downcast_ref::<ClientError>() {
        Some(err) if err.is_unauthorized() => Some(UNAUTHORIZED_HINT.to_string()),
        _ => None,
    }
}
