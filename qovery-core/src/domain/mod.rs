//! Core domain types
//!
//! These types mirror the resources returned by the Qovery API. They are
//! fetched fresh on every command invocation and never cached.

pub mod job;
pub mod scope;
pub mod service;
pub mod stage;
pub mod status;
pub mod variable;

use serde::{Deserialize, Serialize};

/// Reference to another resource, as embedded by the API (`{"id": "..."}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceObject {
    pub id: String,
}
