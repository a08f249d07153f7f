use crate::{PermissionKey, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Primary-key identifier for owners, delegates, and travellers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(i64);

impl SubjectId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for SubjectId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verified identity executing a single request.
///
/// # Invariants
/// - `effective_owner_id == subject_id` unless `role` is [`Role::Delegate`],
///   in which case it is the parent owner's id.
/// - Built fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub role: Role,
    pub subject_id: SubjectId,
    pub effective_owner_id: SubjectId,
    pub permissions: HashSet<PermissionKey>,
}

impl Principal {
    pub fn holds(&self, key: &str) -> bool {
        self.permissions.contains(key)
    }

    /// Whether a resource owned by `owner_id` is in this principal's scope.
    ///
    /// Always compares against the effective owner, so a delegate sees its
    /// parent owner's resources.
    pub fn owns(&self, owner_id: SubjectId) -> bool {
        self.effective_owner_id == owner_id
    }

    pub fn is_delegated(&self) -> bool {
        self.effective_owner_id != self.subject_id
    }
}
