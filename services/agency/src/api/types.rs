//! HTTP API request/response types.
//!
//! # Purpose
//! Defines shared payload shapes for the agency REST API.
use crate::existence::ExistenceResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub store_backend: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

/// Permissions an agent may hand to its agent members, sorted by key.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PermissionsResponse {
    pub role: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmailCheckRequest {
    pub emails: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UsernameCheckRequest {
    pub usernames: Vec<String>,
}

/// Per-value existence answers keyed by the submitted value.
pub type ExistenceResponse = BTreeMap<String, ExistenceResult>;
