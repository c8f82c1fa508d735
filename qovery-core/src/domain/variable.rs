//! Environment variable and secret domain types

use serde::{Deserialize, Serialize};

use super::service::ServiceKind;

/// Level a variable is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableScope {
    Application,
    Container,
    Job,
    Environment,
    Project,
    BuiltIn,
    #[serde(other)]
    Unknown,
}

impl VariableScope {
    /// Scope of variables attached directly to a service of the given kind
    pub fn for_kind(kind: ServiceKind) -> Self {
        match kind {
            ServiceKind::Application => VariableScope::Application,
            ServiceKind::Container => VariableScope::Container,
            ServiceKind::Job | ServiceKind::Cronjob | ServiceKind::Lifecycle => VariableScope::Job,
        }
    }
}

impl std::fmt::Display for VariableScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VariableScope::Application => "APPLICATION",
            VariableScope::Container => "CONTAINER",
            VariableScope::Job => "JOB",
            VariableScope::Environment => "ENVIRONMENT",
            VariableScope::Project => "PROJECT",
            VariableScope::BuiltIn => "BUILT_IN",
            VariableScope::Unknown => "UNKNOWN",
        };
        write!(f, "{}", label)
    }
}

/// Key of the variable an alias or override points at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableRef {
    pub id: String,
    pub key: String,
}

/// A variable or secret visible from a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    pub key: String,
    /// Always absent for secrets
    #[serde(default)]
    pub value: Option<String>,
    pub scope: VariableScope,
    #[serde(default)]
    pub variable_type: Option<String>,
    #[serde(default)]
    pub is_secret: bool,
    #[serde(default)]
    pub aliased_variable: Option<VariableRef>,
    #[serde(default)]
    pub overridden_variable: Option<VariableRef>,
}
