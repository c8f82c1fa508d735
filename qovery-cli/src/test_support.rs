//! In-memory platform used by unit tests
//!
//! Records every call as a line `<method> <args...>` so tests can assert what
//! was sent, and how many times. Environment states are served from a queue
//! whose last element repeats forever.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use qovery_client::{ClientError, JobApi, Result, ScopeApi, ServiceApi, VariableApi};
use qovery_core::domain::ReferenceObject;
use qovery_core::domain::job::{CronjobSchedule, Job, JobSource, Schedule};
use qovery_core::domain::scope::{Environment, Organization, Project};
use qovery_core::domain::service::{
    Application, Container, DockerSource, GitRepository, ImageSource, ServiceKind, ServiceSummary,
};
use qovery_core::domain::stage::DeploymentStage;
use qovery_core::domain::status::{EnvironmentStatus, EnvironmentStatuses, ServiceStatus, State};
use qovery_core::domain::variable::{Variable, VariableScope};
use qovery_core::dto::deploy::{BulkDeployRequest, DeployRequest, ServiceIds};
use qovery_core::dto::job::JobRequest;
use qovery_core::dto::service::{ApplicationEditRequest, CloneServiceRequest, ContainerEditRequest};
use qovery_core::dto::variable::{CreateAlias, CreateOverride, CreateVariable, EditVariable};
use serde_json::Value as JsonValue;

const MUTATIONS: &[&str] = &[
    "deploy_environment",
    "stop_environment",
    "cancel_environment_deployment",
    "deploy_service",
    "stop_service",
    "restart_service",
    "delete_service",
    "deploy_services",
    "stop_services",
    "delete_services",
    "edit_application",
    "edit_container",
    "clone_service",
    "create_job",
    "edit_job",
    "attach_service_to_stage",
    "edit_job_advanced_settings",
    "create_variable",
    "edit_variable",
    "delete_variable",
    "create_alias",
    "create_override",
];

#[derive(Default)]
pub struct FakeApi {
    organizations: Vec<Organization>,
    projects: Vec<Project>,
    environments: Vec<Environment>,
    applications: Vec<Application>,
    containers: Vec<Container>,
    jobs: Vec<Job>,
    job_stage: Option<DeploymentStage>,
    stages: Vec<DeploymentStage>,
    variables: Vec<Variable>,
    env_states: Mutex<VecDeque<State>>,
    service_states: HashMap<String, State>,
    edited_jobs: Mutex<Vec<JobRequest>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Builders =====

    pub fn with_organization(mut self, id: &str, name: &str) -> Self {
        self.organizations.push(Organization {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
        });
        self
    }

    pub fn with_project(mut self, id: &str, name: &str, organization_id: &str) -> Self {
        self.projects.push(Project {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            organization: reference(organization_id),
        });
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environments.push(environment);
        self
    }

    pub fn with_application(mut self, application: Application) -> Self {
        self.applications.push(application);
        self
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn with_job_stage(mut self, stage: DeploymentStage) -> Self {
        self.job_stage = Some(stage);
        self
    }

    pub fn with_stages(mut self, stages: Vec<DeploymentStage>) -> Self {
        self.stages = stages;
        self
    }

    pub fn with_variable(mut self, key: &str, value: &str, scope: VariableScope) -> Self {
        self.variables.push(Variable {
            id: format!("var-{}", key.to_lowercase()),
            key: key.to_string(),
            value: Some(value.to_string()),
            scope,
            variable_type: Some("VALUE".to_string()),
            is_secret: false,
            aliased_variable: None,
            overridden_variable: None,
        });
        self
    }

    pub fn with_env_states(self, states: &[State]) -> Self {
        if let Ok(mut queue) = self.env_states.lock() {
            queue.extend(states.iter().copied());
        }
        self
    }

    pub fn with_service_state(mut self, service_id: &str, state: State) -> Self {
        self.service_states.insert(service_id.to_string(), state);
        self
    }

    // ===== Inspection =====

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls to one method
    pub fn count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(' ').next() == Some(method))
            .count()
    }

    /// Calls that change platform state, in order
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| {
                call.split(' ')
                    .next()
                    .is_some_and(|method| MUTATIONS.contains(&method))
            })
            .collect()
    }

    pub fn edited_jobs(&self) -> Vec<JobRequest> {
        self.edited_jobs.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Pop the next environment state, repeating the last one
    fn next_state(&self) -> State {
        let mut queue = self.env_states.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(State::Deployed)
        } else {
            queue.front().copied().unwrap_or(State::Deployed)
        }
    }

    fn current_state(&self) -> State {
        self.env_states
            .lock()
            .unwrap()
            .front()
            .copied()
            .unwrap_or(State::Deployed)
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::api_error(404, format!("{} not found", what))
}

fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap()
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn reference(id: &str) -> ReferenceObject {
    ReferenceObject { id: id.to_string() }
}

fn job(id: &str, name: &str, source: JobSource, cronjob: Option<CronjobSchedule>) -> Job {
    Job {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        environment: reference("env-1"),
        cpu: 250,
        memory: 256,
        max_nb_restart: Some(0),
        max_duration_seconds: Some(300),
        auto_preview: Some(false),
        port: None,
        source,
        schedule: Schedule {
            cronjob,
            ..Default::default()
        },
    }
}

fn image_source(tag: &str) -> JobSource {
    JobSource {
        image: Some(ImageSource {
            image_name: "acme/worker".to_string(),
            tag: tag.to_string(),
            registry_id: Some("reg-1".to_string()),
        }),
        docker: None,
    }
}

/// Cronjob running an image at `tag`
pub fn cronjob(id: &str, name: &str, tag: &str) -> Job {
    let schedule = CronjobSchedule {
        scheduled_at: "0 3 * * *".to_string(),
        ..Default::default()
    };
    job(id, name, image_source(tag), Some(schedule))
}

/// Lifecycle job running `acme/worker:latest`
pub fn image_lifecycle(id: &str, name: &str) -> Job {
    job(id, name, image_source("latest"), None)
}

/// Lifecycle job built from git, deployed at `commit`
pub fn docker_lifecycle(id: &str, name: &str, commit: &str) -> Job {
    let source = JobSource {
        image: None,
        docker: Some(DockerSource {
            dockerfile_path: Some("Dockerfile".to_string()),
            git_repository: GitRepository {
                url: "https://github.com/acme/jobs.git".to_string(),
                branch: Some("main".to_string()),
                root_path: Some("/".to_string()),
                deployed_commit_id: Some(commit.to_string()),
            },
        }),
    };
    job(id, name, source, None)
}

pub fn environment(id: &str, name: &str, project_id: &str) -> Environment {
    Environment {
        id: id.to_string(),
        name: name.to_string(),
        mode: Some("DEVELOPMENT".to_string()),
        cluster_id: None,
        project: reference(project_id),
        organization: Some(reference("org-1")),
    }
}

pub fn stage(id: &str, name: &str, order: i32, environment_id: &str) -> DeploymentStage {
    DeploymentStage {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        deployment_order: order,
        environment: reference(environment_id),
    }
}

// =============================================================================
// API implementations
// =============================================================================

#[async_trait]
impl ScopeApi for FakeApi {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.record("list_organizations".to_string());
        Ok(self.organizations.clone())
    }

    async fn list_projects(&self, organization_id: &str) -> Result<Vec<Project>> {
        self.record(format!("list_projects {}", organization_id));
        Ok(self
            .projects
            .iter()
            .filter(|p| p.organization.id == organization_id)
            .cloned()
            .collect())
    }

    async fn list_environments(&self, project_id: &str) -> Result<Vec<Environment>> {
        self.record(format!("list_environments {}", project_id));
        Ok(self
            .environments
            .iter()
            .filter(|e| e.project.id == project_id)
            .cloned()
            .collect())
    }

    async fn get_environment(&self, environment_id: &str) -> Result<Environment> {
        self.record(format!("get_environment {}", environment_id));
        self.environments
            .iter()
            .find(|e| e.id == environment_id)
            .cloned()
            .ok_or_else(|| not_found("environment"))
    }

    async fn get_environment_status(&self, environment_id: &str) -> Result<EnvironmentStatus> {
        self.record(format!("get_environment_status {}", environment_id));
        Ok(EnvironmentStatus {
            id: environment_id.to_string(),
            state: self.next_state(),
            last_deployment_state: None,
            last_deployment_date: None,
        })
    }

    async fn get_environment_statuses(&self, environment_id: &str) -> Result<EnvironmentStatuses> {
        self.record(format!("get_environment_statuses {}", environment_id));
        Ok(EnvironmentStatuses {
            environment: EnvironmentStatus {
                id: environment_id.to_string(),
                state: self.current_state(),
                last_deployment_state: None,
                last_deployment_date: None,
            },
            applications: Vec::new(),
            containers: Vec::new(),
            jobs: self
                .service_states
                .iter()
                .map(|(id, state)| ServiceStatus {
                    id: id.clone(),
                    state: *state,
                    message: None,
                })
                .collect(),
            helms: Vec::new(),
            databases: Vec::new(),
        })
    }

    async fn deploy_environment(&self, environment_id: &str) -> Result<()> {
        self.record(format!("deploy_environment {}", environment_id));
        Ok(())
    }

    async fn stop_environment(&self, environment_id: &str) -> Result<()> {
        self.record(format!("stop_environment {}", environment_id));
        Ok(())
    }

    async fn cancel_environment_deployment(&self, environment_id: &str) -> Result<()> {
        self.record(format!("cancel_environment_deployment {}", environment_id));
        Ok(())
    }
}

#[async_trait]
impl ServiceApi for FakeApi {
    async fn list_applications(&self, environment_id: &str) -> Result<Vec<Application>> {
        self.record(format!("list_applications {}", environment_id));
        Ok(self
            .applications
            .iter()
            .filter(|a| a.environment.id == environment_id)
            .cloned()
            .collect())
    }

    async fn list_containers(&self, environment_id: &str) -> Result<Vec<Container>> {
        self.record(format!("list_containers {}", environment_id));
        Ok(self
            .containers
            .iter()
            .filter(|c| c.environment.id == environment_id)
            .cloned()
            .collect())
    }

    async fn list_jobs(&self, environment_id: &str) -> Result<Vec<Job>> {
        self.record(format!("list_jobs {}", environment_id));
        Ok(self
            .jobs
            .iter()
            .filter(|j| j.environment.id == environment_id)
            .cloned()
            .collect())
    }

    async fn deploy_service(
        &self,
        kind: ServiceKind,
        service_id: &str,
        request: &DeployRequest,
    ) -> Result<()> {
        self.record(format!(
            "deploy_service {} {} {}",
            kind.api_segment(),
            service_id,
            json(request)
        ));
        Ok(())
    }

    async fn stop_service(&self, kind: ServiceKind, service_id: &str) -> Result<()> {
        self.record(format!("stop_service {} {}", kind.api_segment(), service_id));
        Ok(())
    }

    async fn restart_service(&self, kind: ServiceKind, service_id: &str) -> Result<()> {
        self.record(format!("restart_service {} {}", kind.api_segment(), service_id));
        Ok(())
    }

    async fn delete_service(&self, kind: ServiceKind, service_id: &str) -> Result<()> {
        self.record(format!("delete_service {} {}", kind.api_segment(), service_id));
        Ok(())
    }

    async fn deploy_services(
        &self,
        environment_id: &str,
        request: &BulkDeployRequest,
    ) -> Result<()> {
        self.record(format!("deploy_services {} {}", environment_id, json(request)));
        Ok(())
    }

    async fn stop_services(&self, environment_id: &str, ids: &ServiceIds) -> Result<()> {
        self.record(format!("stop_services {} {}", environment_id, json(ids)));
        Ok(())
    }

    async fn delete_services(&self, environment_id: &str, ids: &ServiceIds) -> Result<()> {
        self.record(format!("delete_services {} {}", environment_id, json(ids)));
        Ok(())
    }

    async fn edit_application(
        &self,
        application_id: &str,
        request: &ApplicationEditRequest,
    ) -> Result<Application> {
        self.record(format!("edit_application {} {}", application_id, request.name));
        let mut application = self
            .applications
            .iter()
            .find(|a| a.id == application_id)
            .cloned()
            .ok_or_else(|| not_found("application"))?;
        application.git_repository = request.git_repository.clone();
        Ok(application)
    }

    async fn edit_container(
        &self,
        container_id: &str,
        request: &ContainerEditRequest,
    ) -> Result<Container> {
        self.record(format!("edit_container {} {}", container_id, request.name));
        let mut container = self
            .containers
            .iter()
            .find(|c| c.id == container_id)
            .cloned()
            .ok_or_else(|| not_found("container"))?;
        container.image_name = request.image_name.clone();
        container.tag = request.tag.clone();
        Ok(container)
    }

    async fn clone_service(
        &self,
        kind: ServiceKind,
        service_id: &str,
        request: &CloneServiceRequest,
    ) -> Result<ServiceSummary> {
        self.record(format!(
            "clone_service {} {} {}",
            kind.api_segment(),
            service_id,
            json(request)
        ));
        Ok(ServiceSummary {
            id: format!("{}-clone", service_id),
            name: request.name.clone(),
        })
    }
}

#[async_trait]
impl JobApi for FakeApi {
    async fn create_job(&self, environment_id: &str, request: &JobRequest) -> Result<Job> {
        self.record(format!("create_job {} {}", environment_id, request.name));
        Ok(Job {
            id: "job-created".to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
            environment: reference(environment_id),
            cpu: request.cpu,
            memory: request.memory,
            max_nb_restart: request.max_nb_restart,
            max_duration_seconds: request.max_duration_seconds,
            auto_preview: request.auto_preview,
            port: request.port,
            source: request.source.clone(),
            schedule: request.schedule.clone(),
        })
    }

    async fn edit_job(&self, job_id: &str, request: &JobRequest) -> Result<Job> {
        self.record(format!("edit_job {} {}", job_id, request.name));
        self.edited_jobs.lock().unwrap().push(request.clone());
        let mut job = self
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .cloned()
            .ok_or_else(|| not_found("job"))?;
        job.source = request.source.clone();
        Ok(job)
    }

    async fn get_job_deployment_stage(&self, job_id: &str) -> Result<DeploymentStage> {
        self.record(format!("get_job_deployment_stage {}", job_id));
        self.job_stage
            .clone()
            .ok_or_else(|| not_found("deployment stage"))
    }

    async fn list_deployment_stages(&self, environment_id: &str) -> Result<Vec<DeploymentStage>> {
        self.record(format!("list_deployment_stages {}", environment_id));
        Ok(self
            .stages
            .iter()
            .filter(|s| s.environment.id == environment_id)
            .cloned()
            .collect())
    }

    async fn attach_service_to_stage(&self, stage_id: &str, service_id: &str) -> Result<()> {
        self.record(format!("attach_service_to_stage {} {}", stage_id, service_id));
        Ok(())
    }

    async fn get_job_advanced_settings(&self, job_id: &str) -> Result<JsonValue> {
        self.record(format!("get_job_advanced_settings {}", job_id));
        Ok(serde_json::json!({"job.delete_ttl_seconds_after_finished": 60}))
    }

    async fn edit_job_advanced_settings(&self, job_id: &str, _settings: &JsonValue) -> Result<()> {
        self.record(format!("edit_job_advanced_settings {}", job_id));
        Ok(())
    }
}

#[async_trait]
impl VariableApi for FakeApi {
    async fn list_variables(&self, scope: VariableScope, parent_id: &str) -> Result<Vec<Variable>> {
        self.record(format!("list_variables {} {}", scope, parent_id));
        Ok(self.variables.clone())
    }

    async fn create_variable(&self, request: &CreateVariable) -> Result<Variable> {
        self.record(format!("create_variable {}", json(request)));
        Ok(Variable {
            id: format!("var-{}", request.key.to_lowercase()),
            key: request.key.clone(),
            value: (!request.is_secret).then(|| request.value.clone()),
            scope: request.variable_scope,
            variable_type: Some("VALUE".to_string()),
            is_secret: request.is_secret,
            aliased_variable: None,
            overridden_variable: None,
        })
    }

    async fn edit_variable(&self, variable_id: &str, request: &EditVariable) -> Result<Variable> {
        self.record(format!("edit_variable {} {}", variable_id, json(request)));
        let mut variable = self
            .variables
            .iter()
            .find(|v| v.id == variable_id)
            .cloned()
            .ok_or_else(|| not_found("variable"))?;
        variable.value = Some(request.value.clone());
        Ok(variable)
    }

    async fn delete_variable(&self, variable_id: &str) -> Result<()> {
        self.record(format!("delete_variable {}", variable_id));
        Ok(())
    }

    async fn create_alias(&self, variable_id: &str, request: &CreateAlias) -> Result<Variable> {
        self.record(format!("create_alias {} {}", variable_id, json(request)));
        Ok(Variable {
            id: format!("alias-{}", request.key.to_lowercase()),
            key: request.key.clone(),
            value: None,
            scope: request.alias_scope,
            variable_type: Some("ALIAS".to_string()),
            is_secret: false,
            aliased_variable: None,
            overridden_variable: None,
        })
    }

    async fn create_override(
        &self,
        variable_id: &str,
        request: &CreateOverride,
    ) -> Result<Variable> {
        self.record(format!("create_override {} {}", variable_id, json(request)));
        Ok(Variable {
            id: format!("override-{}", variable_id),
            key: variable_id.to_string(),
            value: Some(request.value.clone()),
            scope: request.override_scope,
            variable_type: Some("OVERRIDE".to_string()),
            is_secret: false,
            aliased_variable: None,
            overridden_variable: None,
        })
    }
}
