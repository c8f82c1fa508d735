//! Service action orchestration
//!
//! Commands parse their flags, then hand over to this module which validates
//! flag combinations, resolves names, waits for the environment to settle,
//! triggers the action and optionally watches it complete. Every validation
//! error is raised before the first mutating API call.

pub mod bulk;
pub mod clone;
pub mod environment;
pub mod single;
pub mod update;

use qovery_core::domain::service::{ServiceHandle, ServiceKind, ServiceSource};
use qovery_core::domain::status::State;
use qovery_core::dto::deploy::DeployRequest;

use crate::error::CliError;
use crate::types::parse_name_list;
use crate::watch::WaitPolicy;

/// What an action needs besides its own flags
pub struct ActionContext<'a, A: ?Sized> {
    pub api: &'a A,
    pub environment_id: &'a str,
    pub policy: WaitPolicy,
    pub watch: bool,
}

/// How an action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do; the message explains why
    Skipped(String),
    /// Triggered without watching
    InProgress,
    /// Watched until the service settled
    Finished(State),
}

/// Target of a command taking `--<service>` or `--<services>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

/// Pick the single or the bulk target, exactly one of them must be given
pub fn select_target(
    kind: ServiceKind,
    one: Option<&str>,
    many: Option<&str>,
) -> Result<Selection, CliError> {
    match (one, many) {
        (Some(_), Some(_)) => Err(CliError::validation(format!(
            "use either --{} or --{}, not both",
            kind.as_str(),
            kind.plural()
        ))),
        (None, None) => Err(CliError::validation(format!(
            "one of --{} or --{} is required",
            kind.as_str(),
            kind.plural()
        ))),
        (Some(name), None) => Ok(Selection::One(name.trim().to_string())),
        (None, Some(list)) => {
            let names = parse_name_list(list);
            if names.is_empty() {
                return Err(CliError::validation(format!(
                    "--{} lists no names",
                    kind.plural()
                )));
            }
            Ok(Selection::Many(names))
        }
    }
}

/// `--tag` and `--commit-id` as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionFlags {
    pub tag: Option<String>,
    pub commit_id: Option<String>,
}

impl VersionFlags {
    /// The explicitly requested version, checked against what `kind` accepts
    pub fn requested(&self, kind: ServiceKind) -> Result<Option<DeployRequest>, CliError> {
        let request = match (&self.tag, &self.commit_id) {
            (Some(_), Some(_)) => {
                return Err(CliError::validation(
                    "--tag and --commit-id are mutually exclusive",
                ));
            }
            (Some(tag), None) => Some(DeployRequest::ImageTag(tag.clone())),
            (None, Some(commit)) => Some(DeployRequest::GitCommitId(commit.clone())),
            (None, None) => None,
        };

        match (kind, &request) {
            (ServiceKind::Application, Some(DeployRequest::ImageTag(_))) => Err(
                CliError::validation("applications are built from git; use --commit-id"),
            ),
            (ServiceKind::Container, Some(DeployRequest::GitCommitId(_))) => Err(
                CliError::validation("containers run from an image; use --tag"),
            ),
            _ => Ok(request),
        }
    }
}

/// Version currently deployed for a service, if known
pub fn current_version(handle: &ServiceHandle) -> Option<DeployRequest> {
    match &handle.source {
        ServiceSource::Image(image) => Some(DeployRequest::ImageTag(image.tag.clone())),
        ServiceSource::Docker(docker) => docker
            .git_repository
            .deployed_commit_id
            .clone()
            .map(DeployRequest::GitCommitId),
    }
}

/// Build the deploy payload for a resolved service
///
/// The requested version must match the service source; without one the
/// current version is redeployed.
pub fn deploy_request_for(
    handle: &ServiceHandle,
    requested: Option<DeployRequest>,
) -> Result<DeployRequest, CliError> {
    match (&handle.source, requested) {
        (ServiceSource::Image(_), Some(DeployRequest::GitCommitId(_))) => {
            Err(CliError::validation(format!(
                "{} runs from an image; use --tag instead of --commit-id",
                handle.name
            )))
        }
        (ServiceSource::Docker(_), Some(DeployRequest::ImageTag(_))) => {
            Err(CliError::validation(format!(
                "{} is built from a git repository; use --commit-id instead of --tag",
                handle.name
            )))
        }
        (_, Some(request)) => Ok(request),
        (source, None) => current_version(handle).ok_or_else(|| {
            CliError::validation(format!(
                "no deployed version known for {} ({}); pass --commit-id",
                handle.name,
                source.label()
            ))
        }),
    }
}

/// Drop repeated names, keeping the first occurrence
pub fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
