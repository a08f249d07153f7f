//! Permission keys, catalog entries, and route requirement sets.
//!
//! # Purpose
//! Defines the string-backed permission key type and the static entry shape
//! that pairs a key with the roles entitled to hold it.
//!
//! # How it fits
//! The catalog is a table of [`PermissionEntry`] values. Routes attach a
//! [`RequiredPermissions`] list built from those entries, and the guard checks
//! it against a resolved principal's key set.
//!
//! # Key invariants
//! - Keys follow `resource:action`, both halves non-empty.
//! - An entry's `allowed_roles` is the ceiling of what a role may ever hold.
//!
//! # Examples
//! ```rust
//! use compass_authz::{PermissionEntry, PermissionKey, Role};
//!
//! let entry = PermissionEntry::new("package:read", &[Role::PrimaryOwner, Role::EndUser]);
//! assert!(entry.allows_role(Role::EndUser));
//! assert_eq!(entry.permission_key(), PermissionKey::parse("package:read").unwrap());
//! ```
use crate::{AuthzError, AuthzResult, Role};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// A single grantable capability on one resource/action pair.
///
/// # Invariants
/// - The inner value always contains exactly one `:` separating non-empty
///   resource and action parts when built through [`PermissionKey::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Parse and validate a `resource:action` key.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidPermission`] if either half is missing or empty.
    pub fn parse(value: &str) -> AuthzResult<Self> {
        let (resource, action) = value
            .split_once(':')
            .ok_or_else(|| AuthzError::InvalidPermission(value.to_string()))?;
        if resource.is_empty() || action.is_empty() || action.contains(':') {
            return Err(AuthzError::InvalidPermission(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn resource(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(r, _)| r)
    }

    pub fn action(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, a)| a)
    }
}

impl Borrow<str> for PermissionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for PermissionKey {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static catalog entry: a key plus the roles entitled to hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionEntry {
    pub key: &'static str,
    pub allowed_roles: &'static [Role],
}

impl PermissionEntry {
    pub const fn new(key: &'static str, allowed_roles: &'static [Role]) -> Self {
        Self { key, allowed_roles }
    }

    pub fn allows_role(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    /// Owned key for this entry.
    ///
    /// Catalog keys are compile-time literals checked by the catalog tests, so
    /// this does not re-validate.
    pub fn permission_key(&self) -> PermissionKey {
        PermissionKey(self.key.to_string())
    }
}

/// Ordered requirement list attached to a protected operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredPermissions {
    entries: Vec<PermissionEntry>,
}

impl RequiredPermissions {
    pub fn new(entries: impl IntoIterator<Item = PermissionEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn entries(&self) -> &[PermissionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<PermissionEntry> for RequiredPermissions {
    fn from(entry: PermissionEntry) -> Self {
        Self::new([entry])
    }
}
