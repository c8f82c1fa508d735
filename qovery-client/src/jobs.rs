//! Job-related API endpoints

use async_trait::async_trait;
use qovery_core::domain::job::Job;
use qovery_core::domain::stage::DeploymentStage;
use qovery_core::dto::job::JobRequest;
use qovery_core::dto::list::ListResponse;
use reqwest::Method;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::{NO_BODY, QoveryClient};

/// Job definition, deployment stage and advanced settings endpoints
#[async_trait]
pub trait JobApi: Send + Sync {
    // =============================================================================
    // Job Definition
    // =============================================================================

    /// Create a job in an environment
    async fn create_job(&self, environment_id: &str, request: &JobRequest) -> Result<Job>;

    /// Replace the definition of an existing job
    async fn edit_job(&self, job_id: &str, request: &JobRequest) -> Result<Job>;

    // =============================================================================
    // Deployment Stages
    // =============================================================================

    /// Stage the job is currently attached to
    async fn get_job_deployment_stage(&self, job_id: &str) -> Result<DeploymentStage>;

    /// Stages of an environment
    async fn list_deployment_stages(&self, environment_id: &str) -> Result<Vec<DeploymentStage>>;

    /// Move a service into a stage
    async fn attach_service_to_stage(&self, stage_id: &str, service_id: &str) -> Result<()>;

    // =============================================================================
    // Advanced Settings
    // =============================================================================

    /// Advanced settings are an open key/value document
    async fn get_job_advanced_settings(&self, job_id: &str) -> Result<JsonValue>;

    async fn edit_job_advanced_settings(&self, job_id: &str, settings: &JsonValue) -> Result<()>;
}

#[async_trait]
impl JobApi for QoveryClient {
    async fn create_job(&self, environment_id: &str, request: &JobRequest) -> Result<Job> {
        let path = format!("/environment/{}/job", environment_id);
        self.send_json(Method::POST, &path, request).await
    }

    async fn edit_job(&self, job_id: &str, request: &JobRequest) -> Result<Job> {
        let path = format!("/job/{}", job_id);
        self.send_json(Method::PUT, &path, request).await
    }

    async fn get_job_deployment_stage(&self, job_id: &str) -> Result<DeploymentStage> {
        self.get_json(&format!("/job/{}/deploymentStage", job_id))
            .await
    }

    async fn list_deployment_stages(&self, environment_id: &str) -> Result<Vec<DeploymentStage>> {
        let path = format!("/environment/{}/deploymentStage", environment_id);
        let response: ListResponse<DeploymentStage> = self.get_json(&path).await?;
        Ok(response.into_results())
    }

    async fn attach_service_to_stage(&self, stage_id: &str, service_id: &str) -> Result<()> {
        let path = format!("/deploymentStage/{}/service/{}", stage_id, service_id);
        self.send_empty(Method::PUT, &path, NO_BODY).await
    }

    async fn get_job_advanced_settings(&self, job_id: &str) -> Result<JsonValue> {
        self.get_json(&format!("/job/{}/advancedSettings", job_id))
            .await
    }

    async fn edit_job_advanced_settings(&self, job_id: &str, settings: &JsonValue) -> Result<()> {
        let path = format!("/job/{}/advancedSettings", job_id);
        self.send_empty(Method::PUT, &path, Some(settings)).await
    }
}
