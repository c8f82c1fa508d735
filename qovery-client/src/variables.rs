//! Environment variable and secret endpoints

use async_trait::async_trait;
use qovery_core::domain::variable::{Variable, VariableScope};
use qovery_core::dto::list::ListResponse;
use qovery_core::dto::variable::{CreateAlias, CreateOverride, CreateVariable, EditVariable};
use reqwest::Method;

use crate::error::Result;
use crate::{NO_BODY, QoveryClient};

/// Variable CRUD
#[async_trait]
pub trait VariableApi: Send + Sync {
    /// Variables visible from a resource, inherited ones included
    async fn list_variables(&self, scope: VariableScope, parent_id: &str) -> Result<Vec<Variable>>;

    async fn create_variable(&self, request: &CreateVariable) -> Result<Variable>;

    async fn edit_variable(&self, variable_id: &str, request: &EditVariable) -> Result<Variable>;

    async fn delete_variable(&self, variable_id: &str) -> Result<()>;

    async fn create_alias(&self, variable_id: &str, request: &CreateAlias) -> Result<Variable>;

    async fn create_override(&self, variable_id: &str, request: &CreateOverride)
    -> Result<Variable>;
}

#[async_trait]
impl VariableApi for QoveryClient {
    async fn list_variables(&self, scope: VariableScope, parent_id: &str) -> Result<Vec<Variable>> {
        let scope = scope.to_string();
        let response = self
            .request(Method::GET, "/variable")
            .query(&[("parent_id", parent_id), ("scope", scope.as_str())])
            .send()
            .await?;

        let listing: ListResponse<Variable> = self.handle_response(response).await?;
        Ok(listing.into_results())
    }

    async fn create_variable(&self, request: &CreateVariable) -> Result<Variable> {
        self.send_json(Method::POST, "/variable", request).await
    }

    async fn edit_variable(&self, variable_id: &str, request: &EditVariable) -> Result<Variable> {
        let path = format!("/variable/{}", variable_id);
        self.send_json(Method::PUT, &path, request).await
    }

    async fn delete_variable(&self, variable_id: &str) -> Result<()> {
        let path = format!("/variable/{}", variable_id);
        self.send_empty(Method::DELETE, &path, NO_BODY).await
    }

    async fn create_alias(&self, variable_id: &str, request: &CreateAlias) -> Result<Variable> {
        let path = format!("/variable/{}/alias", variable_id);
        self.send_json(Method::POST, &path, request).await
    }

    async fn create_override(
        &self,
        variable_id: &str,
        request: &CreateOverride,
    ) -> Result<Variable> {
        let path = format!("/variable/{}/override", variable_id);
        self.send_json(Method::POST, &path, request).await
    }
}
