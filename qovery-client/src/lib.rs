//! Qovery HTTP Client
//!
//! A typed HTTP client for the Qovery REST API, used by the command-line
//! client to resolve resources and trigger deployments.
//!
//! Endpoints are grouped behind four traits so callers can depend on an
//! abstraction and tests can substitute an in-memory implementation:
//! - [`ScopeApi`]: organizations, projects, environments and their status
//! - [`ServiceApi`]: applications, containers, jobs and their actions
//! - [`JobApi`]: job creation, deployment stages and advanced settings
//! - [`VariableApi`]: environment variables and secrets
//!
//! # Example
//!
//! ```no_run
//! use qovery_client::{Credentials, QoveryClient, ScopeApi};
//!
//! #[tokio::main]
//! async fn main() -> qovery_client::Result<()> {
//!     let client = QoveryClient::new(
//!         "https://api.qovery.com",
//!         Credentials::bearer("my-token"),
//!     );
//!
//!     for org in client.list_organizations().await? {
//!         println!("{} {}", org.id, org.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod scopes;
mod services;
mod variables;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jobs::JobApi;
pub use scopes::ScopeApi;
pub use services::ServiceApi;
pub use variables::VariableApi;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Every API group at once
pub trait PlatformApi: ScopeApi + ServiceApi + JobApi + VariableApi {}

impl<T> PlatformApi for T where T: ScopeApi + ServiceApi + JobApi + VariableApi {}

/// Token attached to every request as `Authorization: <token_type> <token>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    /// `Bearer` for user sessions, `Token` for API tokens
    pub token_type: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: token_type.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(token, "Bearer")
    }

    /// Value of the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

/// HTTP client for the Qovery API
#[derive(Debug, Clone)]
pub struct QoveryClient {
    /// Base URL of the API (e.g., "https://api.qovery.com")
    base_url: String,
    credentials: Credentials,
    /// HTTP client instance
    client: Client,
}

impl QoveryClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "https://api.qovery.com")
    /// * `credentials` - Token sent with every request
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self::with_client(base_url, credentials, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        credentials: Credentials,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Build an authenticated request for a path relative to the base URL
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("Sending {} {}", method, url);
        self.client
            .request(method, url)
            .header(AUTHORIZATION, self.credentials.header_value())
    }

    /// GET a JSON document
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        self.handle_response(response).await
    }

    /// Send a JSON body and decode the JSON response
    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Send a request whose response body is ignored
    async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-2xx responses become [`ClientError::ApiError`] carrying the body
    /// verbatim.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no meaningful content
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

/// Placeholder body for POST endpoints that take none
pub(crate) const NO_BODY: Option<&()> = None;
