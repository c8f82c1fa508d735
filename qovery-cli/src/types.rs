//! Common types used across CLI modules

use qovery_core::domain::service::ServiceKind;
use uuid::Uuid;

/// A resolved resource: the name the user typed and the platform id behind it
///
/// Fields are private so the id cannot change once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    id: String,
    name: String,
}

impl ResourceRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Kind of anything the resolver can look up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Organization,
    Project,
    Environment,
    Service(ServiceKind),
    /// Environment variable of a service
    Variable(ServiceKind),
}

impl ResourceKind {
    /// Command listing resources of this kind, suggested on lookup misses
    pub fn list_command(&self) -> String {
        match self {
            ResourceKind::Organization => "qovery organization list".to_string(),
            ResourceKind::Project => "qovery project list".to_string(),
            ResourceKind::Environment => "qovery environment list".to_string(),
            ResourceKind::Service(kind) => format!("qovery {} list", kind),
            ResourceKind::Variable(kind) => format!("qovery {} env list", kind),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Organization => write!(f, "organization"),
            ResourceKind::Project => write!(f, "project"),
            ResourceKind::Environment => write!(f, "environment"),
            ResourceKind::Service(kind) => write!(f, "{}", kind),
            ResourceKind::Variable(_) => write!(f, "variable"),
        }
    }
}

/// Whether the input already is a platform id rather than a name
pub fn looks_like_id(input: &str) -> bool {
    Uuid::parse_str(input).is_ok()
}

/// Split a comma-separated name list
///
/// Elements are trimmed and empty ones dropped; order is kept.
pub fn parse_name_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
