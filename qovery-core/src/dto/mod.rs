//! Data Transfer Objects sent to the Qovery API
//!
//! Request bodies for deploy/stop/delete actions, job creation and edition,
//! service clone and variable management.

pub mod deploy;
pub mod job;
pub mod list;
pub mod service;
pub mod variable;
