//! Qovery Core
//!
//! Core types for the Qovery command-line client.
//!
//! This crate contains:
//! - Domain types: platform resources (organization, project, environment,
//!   services, jobs, statuses, deployment stages, variables)
//! - DTOs: request payloads sent to the platform API

pub mod domain;
pub mod dto;
