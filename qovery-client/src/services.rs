//! Application, container and job endpoints

use async_trait::async_trait;
use qovery_core::domain::job::Job;
use qovery_core::domain::service::{Application, Container, ServiceKind, ServiceSummary};
use qovery_core::dto::deploy::{BulkDeployRequest, DeployRequest, ServiceIds};
use qovery_core::dto::list::ListResponse;
use qovery_core::dto::service::{
    ApplicationEditRequest, CloneServiceRequest, ContainerEditRequest,
};
use reqwest::Method;

use crate::error::Result;
use crate::{NO_BODY, QoveryClient};

/// Service listing and actions
#[async_trait]
pub trait ServiceApi: Send + Sync {
    // =============================================================================
    // Listing
    // =============================================================================

    async fn list_applications(&self, environment_id: &str) -> Result<Vec<Application>>;

    async fn list_containers(&self, environment_id: &str) -> Result<Vec<Container>>;

    /// List jobs of an environment, cronjobs and lifecycle jobs alike
    async fn list_jobs(&self, environment_id: &str) -> Result<Vec<Job>>;

    // =============================================================================
    // Single-service actions
    // =============================================================================

    /// Deploy one service at the given version
    async fn deploy_service(
        &self,
        kind: ServiceKind,
        service_id: &str,
        request: &DeployRequest,
    ) -> Result<()>;

    async fn stop_service(&self, kind: ServiceKind, service_id: &str) -> Result<()>;

    /// Redeploy a service at its current version
    async fn restart_service(&self, kind: ServiceKind, service_id: &str) -> Result<()>;

    async fn delete_service(&self, kind: ServiceKind, service_id: &str) -> Result<()>;

    // =============================================================================
    // Batched actions
    // =============================================================================

    async fn deploy_services(&self, environment_id: &str, request: &BulkDeployRequest)
    -> Result<()>;

    async fn stop_services(&self, environment_id: &str, ids: &ServiceIds) -> Result<()>;

    async fn delete_services(&self, environment_id: &str, ids: &ServiceIds) -> Result<()>;

    // =============================================================================
    // Edition
    // =============================================================================

    async fn edit_application(
        &self,
        application_id: &str,
        request: &ApplicationEditRequest,
    ) -> Result<Application>;

    async fn edit_container(
        &self,
        container_id: &str,
        request: &ContainerEditRequest,
    ) -> Result<Container>;

    /// Clone an application or a container through the platform clone endpoint
    async fn clone_service(
        &self,
        kind: ServiceKind,
        service_id: &str,
        request: &CloneServiceRequest,
    ) -> Result<ServiceSummary>;
}

#[async_trait]
impl ServiceApi for QoveryClient {
    async fn list_applications(&self, environment_id: &str) -> Result<Vec<Application>> {
        let path = format!("/environment/{}/application", environment_id);
        let response: ListResponse<Application> = self.get_json(&path).await?;
        Ok(response.into_results())
    }

    async fn list_containers(&self, environment_id: &str) -> Result<Vec<Container>> {
        let path = format!("/environment/{}/container", environment_id);
        let response: ListResponse<Container> = self.get_json(&path).await?;
        Ok(response.into_results())
    }

    async fn list_jobs(&self, environment_id: &str) -> Result<Vec<Job>> {
        let path = format!("/environment/{}/job", environment_id);
        let response: ListResponse<Job> = self.get_json(&path).await?;
        Ok(response.into_results())
    }

    async fn deploy_service(
        &self,
        kind: ServiceKind,
        service_id: &str,
        request: &DeployRequest,
    ) -> Result<()> {
        let path = format!("/{}/{}/deploy", kind.api_segment(), service_id);
        self.send_empty(Method::POST, &path, Some(request)).await
    }

    async fn stop_service(&self, kind: ServiceKind, service_id: &str) -> Result<()> {
        let path = format!("/{}/{}/stop", kind.api_segment(), service_id);
        self.send_empty(Method::POST, &path, NO_BODY).await
    }

    async fn restart_service(&self, kind: ServiceKind, service_id: &str) -> Result<()> {
        let path = format!("/{}/{}/restart", kind.api_segment(), service_id);
        self.send_empty(Method::POST, &path, NO_BODY).await
    }

    async fn delete_service(&self, kind: ServiceKind, service_id: &str) -> Result<()> {
        let path = format!("/{}/{}", kind.api_segment(), service_id);
        self.send_empty(Method::DELETE, &path, NO_BODY).await
    }

    async fn deploy_services(
        &self,
        environment_id: &str,
        request: &BulkDeployRequest,
    ) -> Result<()> {
        let path = format!("/environment/{}/service/deploy", environment_id);
        self.send_empty(Method::POST, &path, Some(request)).await
    }

    async fn stop_services(&self, environment_id: &str, ids: &ServiceIds) -> Result<()> {
        let path = format!("/environment/{}/service/stop", environment_id);
        self.send_empty(Method::POST, &path, Some(ids)).await
    }

    async fn delete_services(&self, environment_id: &str, ids: &ServiceIds) -> Result<()> {
        let path = format!("/environment/{}/service/delete", environment_id);
        self.send_empty(Method::POST, &path, Some(ids)).await
    }

    async fn edit_application(
        &self,
        application_id: &str,
        request: &ApplicationEditRequest,
    ) -> Result<Application> {
        let path = format!("/application/{}", application_id);
        self.send_json(Method::PUT, &path, request).await
    }

    async fn edit_container(
        &self,
        container_id: &str,
        request: &ContainerEditRequest,
    ) -> Result<Container> {
        let path = format!("/container/{}", container_id);
        self.send_json(Method::PUT, &path, request).await
    }

    async fn clone_service(
        &self,
        kind: ServiceKind,
        service_id: &str,
        request: &CloneServiceRequest,
    ) -> Result<ServiceSummary> {
        let path = format!("/{}/{}/clone", kind.api_segment(), service_id);
        self.send_json(Method::POST, &path, request).await
    }
}
