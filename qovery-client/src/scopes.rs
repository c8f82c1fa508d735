//! Organization, project and environment endpoints

use async_trait::async_trait;
use qovery_core::domain::scope::{Environment, Organization, Project};
use qovery_core::domain::status::{EnvironmentStatus, EnvironmentStatuses};
use qovery_core::dto::list::ListResponse;
use reqwest::Method;

use crate::error::Result;
use crate::{NO_BODY, QoveryClient};

/// Scope hierarchy listing and environment-level actions
#[async_trait]
pub trait ScopeApi: Send + Sync {
    /// List organizations the token has access to
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// List projects of an organization
    async fn list_projects(&self, organization_id: &str) -> Result<Vec<Project>>;

    /// List environments of a project
    async fn list_environments(&self, project_id: &str) -> Result<Vec<Environment>>;

    /// Get an environment by id
    async fn get_environment(&self, environment_id: &str) -> Result<Environment>;

    /// Get the aggregated status of an environment
    async fn get_environment_status(&self, environment_id: &str) -> Result<EnvironmentStatus>;

    /// Get the environment status along with every service status
    async fn get_environment_statuses(&self, environment_id: &str)
    -> Result<EnvironmentStatuses>;

    /// Deploy every service of an environment
    async fn deploy_environment(&self, environment_id: &str) -> Result<()>;

    /// Stop every service of an environment
    async fn stop_environment(&self, environment_id: &str) -> Result<()>;

    /// Cancel the deployment running on an environment
    async fn cancel_environment_deployment(&self, environment_id: &str) -> Result<()>;
}

#[async_trait]
impl ScopeApi for QoveryClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let response: ListResponse<Organization> = self.get_json("/organization").await?;
        Ok(response.into_results())
    }

    async fn list_projects(&self, organization_id: &str) -> Result<Vec<Project>> {
        let path = format!("/organization/{}/project", organization_id);
        let response: ListResponse<Project> = self.get_json(&path).await?;
        Ok(response.into_results())
    }

    async fn list_environments(&self, project_id: &str) -> Result<Vec<Environment>> {
        let path = format!("/project/{}/environment", project_id);
        let response: ListResponse<Environment> = self.get_json(&path).await?;
        Ok(response.into_results())
    }

    async fn get_environment(&self, environment_id: &str) -> Result<Environment> {
        self.get_json(&format!("/environment/{}", environment_id))
            .await
    }

    async fn get_environment_status(&self, environment_id: &str) -> Result<EnvironmentStatus> {
        self.get_json(&format!("/environment/{}/status", environment_id))
            .await
    }

    async fn get_environment_statuses(
        &self,
        environment_id: &str,
    ) -> Result<EnvironmentStatuses> {
        self.get_json(&format!("/environment/{}/statuses", environment_id))
            .await
    }

    async fn deploy_environment(&self, environment_id: &str) -> Result<()> {
        let path = format!("/environment/{}/deploy", environment_id);
        self.send_empty(Method::POST, &path, NO_BODY).await
    }

    async fn stop_environment(&self, environment_id: &str) -> Result<()> {
        let path = format!("/environment/{}/stop", environment_id);
        self.send_empty(Method::POST, &path, NO_BODY).await
    }

    async fn cancel_environment_deployment(&self, environment_id: &str) -> Result<()> {
        let path = format!("/environment/{}/cancel", environment_id);
        self.send_empty(Method::POST, &path, NO_BODY).await
    }
}
