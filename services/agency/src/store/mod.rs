//! Principal store adapter.
//!
//! # Purpose
//! Narrow, read-mostly boundary the access-control pipeline uses to confirm a
//! subject is still live and to answer bulk existence queries. Entity CRUD is
//! owned elsewhere; only the lookups the pipeline needs are part of the trait.
use async_trait::async_trait;
use compass_authz::SubjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;
pub mod seed;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub owner_id: SubjectId,
    pub email: String,
}

/// Stored agent member. `permissions` is the list the owner granted at
/// creation time, as raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateRecord {
    pub delegate_id: SubjectId,
    pub parent_owner_id: SubjectId,
    pub username: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndUserRecord {
    pub traveller_id: SubjectId,
    pub email: String,
    pub username: String,
}

/// Unique traveller field an existence check runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupField {
    Email,
    Username,
}

impl LookupField {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupField::Email => "email",
            LookupField::Username => "username",
        }
    }

    pub fn value_of(self, record: &EndUserRecord) -> &str {
        match self {
            LookupField::Email => &record.email,
            LookupField::Username => &record.username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingCandidate {
    pub value: String,
    pub id: SubjectId,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Liveness lookups by primary id, one per role.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_owner(&self, owner_id: SubjectId) -> StoreResult<Option<OwnerRecord>>;
    async fn find_delegate(&self, delegate_id: SubjectId) -> StoreResult<Option<DelegateRecord>>;
    async fn find_end_user(&self, traveller_id: SubjectId) -> StoreResult<Option<EndUserRecord>>;
}

/// Batched existence lookups over a unique traveller field.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Return the subset of `candidates` that exist, with their ids.
    async fn find_existing(
        &self,
        field: LookupField,
        candidates: &[String],
    ) -> StoreResult<Vec<ExistingCandidate>>;

    /// Every stored value for `field`; used to warm membership filters.
    async fn list_values(&self, field: LookupField) -> StoreResult<Vec<String>>;
}

pub trait AgencyStore: PrincipalStore + CandidateStore {
    fn backend_name(&self) -> &'static str;
}
