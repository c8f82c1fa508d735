//! ID resolver module
//!
//! Maps the human names typed on the command line to platform ids. Matching
//! is exact and case-sensitive against the listing returned by the API; the
//! first match wins. A miss fails fast with [`CliError::NotFound`], whose hint
//! points at the matching `list` command.

use qovery_client::{ScopeApi, ServiceApi, VariableApi};
use qovery_core::domain::job::{Job, variant_of};
use qovery_core::domain::scope::{Environment, Named};
use qovery_core::domain::service::{Application, Container, ServiceHandle, ServiceKind};
use qovery_core::domain::variable::{Variable, VariableScope};
use tracing::debug;

use crate::config::Context;
use crate::error::CliError;
use crate::types::{ResourceKind, ResourceRef, looks_like_id};

// =============================================================================
// Matching
// =============================================================================

/// Find the first item named exactly `name`
pub fn match_name<'a, T: Named>(
    items: &'a [T],
    kind: ResourceKind,
    name: &str,
) -> Result<&'a T, CliError> {
    items
        .iter()
        .find(|item| item.name() == name)
        .ok_or_else(|| CliError::NotFound {
            kind,
            name: name.to_string(),
        })
}

/// Resolve a name within a listing to a [`ResourceRef`]
pub fn resolve<T: Named>(
    items: &[T],
    kind: ResourceKind,
    name: &str,
) -> Result<ResourceRef, CliError> {
    let item = match_name(items, kind, name)?;
    Ok(ResourceRef::new(item.id(), item.name()))
}

// =============================================================================
// Scope hierarchy
// =============================================================================

/// Resolve an organization name or id
pub async fn resolve_organization<A>(api: &A, input: &str) -> Result<ResourceRef, CliError>
where
    A: ScopeApi + ?Sized,
{
    if looks_like_id(input) {
        return Ok(ResourceRef::new(input, input));
    }
    let organizations = api.list_organizations().await?;
    resolve(&organizations, ResourceKind::Organization, input)
}

/// Resolve a project name or id within an organization
pub async fn resolve_project<A>(
    api: &A,
    organization_id: &str,
    input: &str,
) -> Result<ResourceRef, CliError>
where
    A: ScopeApi + ?Sized,
{
    if looks_like_id(input) {
        return Ok(ResourceRef::new(input, input));
    }
    let projects = api.list_projects(organization_id).await?;
    resolve(&projects, ResourceKind::Project, input)
}

/// Resolve an environment name or id within a project
///
/// An id is looked up directly so the returned reference carries the real name.
pub async fn resolve_environment<A>(
    api: &A,
    project_id: &str,
    input: &str,
) -> Result<ResourceRef, CliError>
where
    A: ScopeApi + ?Sized,
{
    if looks_like_id(input) {
        let environment = api.get_environment(input).await?;
        return Ok(ResourceRef::new(environment.id, environment.name));
    }
    let environments = api.list_environments(project_id).await?;
    resolve(&environments, ResourceKind::Environment, input)
}

/// Scope flags as typed on the command line
#[derive(Debug, Clone, Default)]
pub struct ScopeInput<'a> {
    pub organization: Option<&'a str>,
    pub project: Option<&'a str>,
    pub environment: Option<&'a str>,
}

/// Environment a command operates on, with its parents when known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentScope {
    pub organization_id: Option<String>,
    pub project_id: Option<String>,
    pub environment: ResourceRef,
}

impl EnvironmentScope {
    pub fn environment_id(&self) -> &str {
        self.environment.id()
    }
}

/// Resolve the organization from flags, falling back to the context
pub async fn organization_scope<A>(
    api: &A,
    input: &ScopeInput<'_>,
    context: &Context,
) -> Result<String, CliError>
where
    A: ScopeApi + ?Sized,
{
    match (input.organization, context.organization_id.as_deref()) {
        (Some(name), _) => Ok(resolve_organization(api, name).await?.id().to_string()),
        (None, Some(id)) => Ok(id.to_string()),
        (None, None) => Err(CliError::validation(
            "no organization selected: pass --organization or run `qovery context set`",
        )),
    }
}

/// Resolve the project from flags, falling back to the context
pub async fn project_scope<A>(
    api: &A,
    input: &ScopeInput<'_>,
    context: &Context,
) -> Result<String, CliError>
where
    A: ScopeApi + ?Sized,
{
    Ok(project_with_organization(api, input, context).await?.1)
}

/// Project id along with the organization id when it is known
async fn project_with_organization<A>(
    api: &A,
    input: &ScopeInput<'_>,
    context: &Context,
) -> Result<(Option<String>, String), CliError>
where
    A: ScopeApi + ?Sized,
{
    match (input.project, context.project_id.as_deref()) {
        (Some(id), _) if looks_like_id(id) => {
            let organization_id = input
                .organization
                .filter(|org| looks_like_id(org))
                .map(str::to_string)
                .or_else(|| context.organization_id.clone());
            Ok((organization_id, id.to_string()))
        }
        (Some(name), _) => {
            let organization_id = organization_scope(api, input, context).await?;
            let project = resolve_project(api, &organization_id, name).await?;
            Ok((Some(organization_id), project.id().to_string()))
        }
        (None, Some(id)) => Ok((context.organization_id.clone(), id.to_string())),
        (None, None) => Err(CliError::validation(
            "no project selected: pass --project or run `qovery context set`",
        )),
    }
}

/// Resolve the environment a command targets
///
/// Flags win over the context file. Parents are only looked up when the
/// environment is given by name.
pub async fn environment_scope<A>(
    api: &A,
    input: &ScopeInput<'_>,
    context: &Context,
) -> Result<EnvironmentScope, CliError>
where
    A: ScopeApi + ?Sized,
{
    match input.environment {
        Some(id) if looks_like_id(id) => {
            let environment = api.get_environment(id).await?;
            Ok(scope_of(&environment))
        }
        Some(name) => {
            let (organization_id, project_id) =
                project_with_organization(api, input, context).await?;
            let environment = resolve_environment(api, &project_id, name).await?;
            Ok(EnvironmentScope {
                organization_id,
                project_id: Some(project_id),
                environment,
            })
        }
        None => {
            let id = context.environment_id.as_deref().ok_or_else(|| {
                CliError::validation(
                    "no environment selected: pass --environment or run `qovery context set`",
                )
            })?;
            let name = context.environment_name.as_deref().unwrap_or(id);
            Ok(EnvironmentScope {
                organization_id: context.organization_id.clone(),
                project_id: context.project_id.clone(),
                environment: ResourceRef::new(id, name),
            })
        }
    }
}

fn scope_of(environment: &Environment) -> EnvironmentScope {
    EnvironmentScope {
        organization_id: environment.organization.as_ref().map(|org| org.id.clone()),
        project_id: Some(environment.project.id.clone()),
        environment: ResourceRef::new(&environment.id, &environment.name),
    }
}

// =============================================================================
// Services
// =============================================================================

/// Find an application by name
pub async fn find_application<A>(
    api: &A,
    environment_id: &str,
    name: &str,
) -> Result<Application, CliError>
where
    A: ServiceApi + ?Sized,
{
    let applications = api.list_applications(environment_id).await?;
    let kind = ResourceKind::Service(ServiceKind::Application);
    Ok(match_name(&applications, kind, name)?.clone())
}

/// Find a container by name
pub async fn find_container<A>(
    api: &A,
    environment_id: &str,
    name: &str,
) -> Result<Container, CliError>
where
    A: ServiceApi + ?Sized,
{
    let containers = api.list_containers(environment_id).await?;
    let kind = ResourceKind::Service(ServiceKind::Container);
    Ok(match_name(&containers, kind, name)?.clone())
}

/// Find a job by name, restricted to the variant `kind` asks for
///
/// Only the schedule is inspected here, so a malformed job elsewhere in the
/// environment does not break the lookup.
pub async fn find_job<A>(
    api: &A,
    environment_id: &str,
    kind: ServiceKind,
    name: &str,
) -> Result<Job, CliError>
where
    A: ServiceApi + ?Sized,
{
    let jobs = jobs_of_kind(api, environment_id, kind).await?;
    Ok(match_name(&jobs, ResourceKind::Service(kind), name)?.clone())
}

async fn jobs_of_kind<A>(api: &A, environment_id: &str, kind: ServiceKind) -> Result<Vec<Job>, CliError>
where
    A: ServiceApi + ?Sized,
{
    let jobs = api.list_jobs(environment_id).await?;
    Ok(jobs
        .into_iter()
        .filter(|job| kind.accepts(variant_of(&job.schedule).kind()))
        .collect())
}

/// Services of one kind, unclassified jobs kept raw
enum Listing {
    Applications(Vec<Application>),
    Containers(Vec<Container>),
    Jobs(Vec<Job>),
}

impl Listing {
    async fn fetch<A>(api: &A, environment_id: &str, kind: ServiceKind) -> Result<Self, CliError>
    where
        A: ServiceApi + ?Sized,
    {
        Ok(match kind {
            ServiceKind::Application => {
                Listing::Applications(api.list_applications(environment_id).await?)
            }
            ServiceKind::Container => Listing::Containers(api.list_containers(environment_id).await?),
            _ => Listing::Jobs(jobs_of_kind(api, environment_id, kind).await?),
        })
    }

    /// Handle of the first service named `name`, if any
    fn find(&self, name: &str) -> Option<Result<ServiceHandle, CliError>> {
        match self {
            Listing::Applications(items) => items
                .iter()
                .find(|app| app.name == name)
                .map(|app| Ok(app.handle())),
            Listing::Containers(items) => items
                .iter()
                .find(|container| container.name == name)
                .map(|container| Ok(container.handle())),
            Listing::Jobs(items) => items
                .iter()
                .find(|job| job.name == name)
                .map(|job| job.handle().map_err(CliError::from)),
        }
    }

    fn handles(&self) -> Result<Vec<ServiceHandle>, CliError> {
        match self {
            Listing::Applications(items) => Ok(items.iter().map(Application::handle).collect()),
            Listing::Containers(items) => Ok(items.iter().map(Container::handle).collect()),
            Listing::Jobs(items) => items
                .iter()
                .map(|job| job.handle().map_err(CliError::from))
                .collect(),
        }
    }
}

/// All services of a kind in an environment
pub async fn list_services<A>(
    api: &A,
    environment_id: &str,
    kind: ServiceKind,
) -> Result<Vec<ServiceHandle>, CliError>
where
    A: ServiceApi + ?Sized,
{
    Listing::fetch(api, environment_id, kind).await?.handles()
}

/// Resolve one service by name
pub async fn find_service<A>(
    api: &A,
    environment_id: &str,
    kind: ServiceKind,
    name: &str,
) -> Result<ServiceHandle, CliError>
where
    A: ServiceApi + ?Sized,
{
    let listing = Listing::fetch(api, environment_id, kind).await?;
    let handle = listing.find(name).ok_or_else(|| CliError::NotFound {
        kind: ResourceKind::Service(kind),
        name: name.to_string(),
    })??;

    debug!("Resolved {} '{}' to {}", kind, name, handle.id);
    Ok(handle)
}

/// Resolve several services from a single listing
///
/// Every name is attempted; if any is missing the error lists all of them.
pub async fn find_services<A>(
    api: &A,
    environment_id: &str,
    kind: ServiceKind,
    names: &[String],
) -> Result<Vec<ServiceHandle>, CliError>
where
    A: ServiceApi + ?Sized,
{
    let listing = Listing::fetch(api, environment_id, kind).await?;

    let mut handles = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        match listing.find(name) {
            Some(handle) => handles.push(handle?),
            None => missing.push(name.clone()),
        }
    }

    if missing.is_empty() {
        Ok(handles)
    } else {
        Err(CliError::Unresolved {
            kind,
            names: missing,
        })
    }
}

// =============================================================================
// Variables
// =============================================================================

/// Variables visible from a service
pub async fn list_variables<A>(api: &A, service: &ServiceHandle) -> Result<Vec<Variable>, CliError>
where
    A: VariableApi + ?Sized,
{
    let scope = VariableScope::for_kind(service.kind);
    Ok(api.list_variables(scope, &service.id).await?)
}

/// Find a variable visible from a service by key
pub async fn resolve_variable<A>(
    api: &A,
    service: &ServiceHandle,
    key: &str,
) -> Result<Variable, CliError>
where
    A: VariableApi + ?Sized,
{
    let variables = list_variables(api, service).await?;
    variables
        .into_iter()
        .find(|variable| variable.key == key)
        .ok_or_else(|| CliError::NotFound {
            kind: ResourceKind::Variable(service.kind),
            name: key.to_string(),
        })
}
