//! Variable DTOs

use serde::{Deserialize, Serialize};

use crate::domain::variable::VariableScope;

/// Request to create a variable or secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVariable {
    pub key: String,
    pub value: String,
    pub is_secret: bool,
    pub variable_scope: VariableScope,
    pub variable_parent_id: String,
}

/// Request to edit a variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditVariable {
    pub key: String,
    pub value: String,
}

/// Request to alias an existing variable under a new key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlias {
    pub key: String,
    pub alias_scope: VariableScope,
    pub alias_parent_id: String,
}

/// Request to override an existing variable's value at a narrower scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOverride {
    pub value: String,
    pub override_scope: VariableScope,
    pub override_parent_id: String,
}
