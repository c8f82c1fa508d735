//! Deployment stage domain model
//!
//! Services of an environment are deployed stage by stage, in ascending
//! `deployment_order`.

use serde::{Deserialize, Serialize};

use super::ReferenceObject;

/// A deployment stage of an environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub deployment_order: i32,
    pub environment: ReferenceObject,
}
