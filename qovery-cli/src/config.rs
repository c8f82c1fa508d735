//! Configuration module
//!
//! Combines global flags, environment variables and the cached context file
//! (`~/.qovery/context.json`) into the settings a command runs with.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use qovery_client::{Credentials, QoveryClient};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;
use crate::watch::WaitPolicy;

pub const DEFAULT_API_URL: &str = "https://api.qovery.com";
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Token and default scope persisted between invocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
}

impl Context {
    /// Default location of the context file
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qovery").join("context.json"))
    }

    /// Load the context file; a missing file yields an empty context
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No context file at {}", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid context file {}", path.display()))
    }

    /// Write the context file, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write context file {}", path.display()))
    }
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Qovery API
    pub api_url: String,

    /// Token from `--token` or `QOVERY_CLI_ACCESS_TOKEN`; falls back to the context
    pub token: Option<String>,

    /// `Bearer` or `Token`
    pub token_type: Option<String>,

    /// HTTP request timeout
    pub request_timeout: Duration,

    /// Status polling cadence and deadline
    pub wait: WaitPolicy,

    pub context_path: PathBuf,
    pub context: Context,
}

impl Config {
    /// Creates a configuration with defaults and an empty context
    pub fn new(api_url: impl Into<String>, context_path: PathBuf) -> Self {
        Self {
            api_url: api_url.into(),
            token: None,
            token_type: None,
            request_timeout: Duration::from_secs(30),
            wait: WaitPolicy::default(),
            context_path,
            context: Context::default(),
        }
    }

    /// Validates configuration values
    pub fn validate(&self) -> Result<(), CliError> {
        if self.api_url.trim().is_empty() {
            return Err(CliError::validation("--api-url must not be empty"));
        }
        if self.wait.interval.is_zero() {
            return Err(CliError::validation("--poll-interval-secs must be > 0"));
        }
        if self.request_timeout.is_zero() {
            return Err(CliError::validation("--timeout-secs must be > 0"));
        }
        match self.token_type.as_deref() {
            None | Some("Bearer") | Some("Token") => Ok(()),
            Some(other) => Err(CliError::validation(format!(
                "unsupported token type '{}', expected Bearer or Token",
                other
            ))),
        }
    }

    /// Token in effect, flag or environment first, then the context file
    pub fn credentials(&self) -> Result<Credentials, CliError> {
        let token = self
            .token
            .clone()
            .or_else(|| self.context.access_token.clone())
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                CliError::validation(
                    "no access token: pass --token or set QOVERY_CLI_ACCESS_TOKEN",
                )
            })?;

        let token_type = self
            .token_type
            .clone()
            .or_else(|| self.context.token_type.clone())
            .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string());

        Ok(Credentials::new(token, token_type))
    }

    /// Build an authenticated API client
    pub fn client(&self) -> Result<QoveryClient, CliError> {
        let credentials = self.credentials()?;
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(qovery_client::ClientError::from)?;

        Ok(QoveryClient::with_client(&self.api_url, credentials, http))
    }

    /// Persist the in-memory context
    pub fn save_context(&self) -> Result<()> {
        self.context.save(&self.context_path)
    }
}
