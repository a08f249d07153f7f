//! Identity resolution.
//!
//! # Purpose and responsibility
//! Turns a verified credential's `(role, subject id)` into a live [`Principal`]:
//! confirms the subject still exists, computes its effective permissions, and
//! substitutes the owning identity for delegates.
//!
//! # Key invariants and assumptions
//! - Exactly one store read per call; no writes, no caching.
//! - Owners and travellers get role-derived permissions; delegates get their
//!   stored list clamped to what an owner could grant.
//! - A delegate's `effective_owner_id` is always its parent owner.
//!
//! # Security considerations
//! - Every branch ends in an explicit principal or an explicit error; an
//!   unknown role is `Forbidden`, a missing subject is `Unauthenticated`.
use crate::auth::error::AccessError;
use crate::store::PrincipalStore;
use compass_authz::catalog::{derive_permissions, owner_grantable};
use compass_authz::{PermissionKey, Principal, Role, SubjectId};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn PrincipalStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn PrincipalStore>) -> Self {
        Self { store }
    }

    /// Resolve a credential's claimed role and subject into a principal.
    ///
    /// # Errors
    /// - [`AccessError::Forbidden`] for a role outside the closed enumeration.
    /// - [`AccessError::Unauthenticated`] when the subject no longer exists.
    /// - [`AccessError::StoreUnavailable`] when the lookup fails.
    pub async fn resolve(&self, role: &str, subject_id: SubjectId) -> Result<Principal, AccessError> {
        let Ok(role) = role.parse::<Role>() else {
            tracing::warn!(%role, %subject_id, "credential carries unknown role");
            return Err(AccessError::Forbidden("unknown role"));
        };

        match role {
            Role::PrimaryOwner => {
                let Some(owner) = self.store.find_owner(subject_id).await? else {
                    return Err(AccessError::Unauthenticated("owner no longer exists"));
                };
                Ok(Principal {
                    role,
                    subject_id: owner.owner_id,
                    effective_owner_id: owner.owner_id,
                    permissions: derive_permissions(Role::PrimaryOwner),
                })
            }
            Role::Delegate => {
                let Some(delegate) = self.store.find_delegate(subject_id).await? else {
                    return Err(AccessError::Unauthenticated("delegate no longer exists"));
                };
                Ok(Principal {
                    role,
                    subject_id: delegate.delegate_id,
                    effective_owner_id: delegate.parent_owner_id,
                    permissions: delegated_permissions(delegate.delegate_id, &delegate.permissions),
                })
            }
            Role::EndUser => {
                let Some(traveller) = self.store.find_end_user(subject_id).await? else {
                    return Err(AccessError::Unauthenticated("traveller no longer exists"));
                };
                Ok(Principal {
                    role,
                    subject_id: traveller.traveller_id,
                    effective_owner_id: traveller.traveller_id,
                    permissions: derive_permissions(Role::EndUser),
                })
            }
        }
    }
}

/// Keep only stored keys an owner could have granted to a delegate.
fn delegated_permissions(delegate_id: SubjectId, stored: &[String]) -> HashSet<PermissionKey> {
    let mut granted = HashSet::with_capacity(stored.len());
    for raw in stored {
        match PermissionKey::parse(raw) {
            Ok(key) if owner_grantable(key.as_str()) => {
                granted.insert(key);
            }
            _ => {
                tracing::warn!(%delegate_id, permission = %raw, "dropping ungrantable delegate permission");
            }
        }
    }
    granted
}
