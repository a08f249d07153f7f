//! Static permission catalog and role-keyed derivation.
//!
//! # Purpose
//! Declares every permission key the agency API knows about, each annotated
//! with the roles entitled to hold it, and derives role-wide permission sets.
//!
//! # How it fits
//! Owners and travellers get their permissions from [`derive_permissions`].
//! Delegates carry a stored per-member list, which is clamped to what an owner
//! could grant ([`owner_grantable`]). Routes reference the grouped constants
//! (e.g. [`package::UPDATE`]) when declaring requirements.
//!
//! # Key invariants
//! - Keys are unique within [`CATALOG`].
//! - Derivation never yields a key that is not in [`CATALOG`].
use crate::{PermissionEntry, PermissionKey, Role};
use std::collections::HashSet;

const OWNER_AND_DELEGATE: &[Role] = &[Role::PrimaryOwner, Role::Delegate];
const EVERY_ROLE: &[Role] = &[Role::PrimaryOwner, Role::EndUser, Role::Delegate];

pub mod package {
    use super::*;

    pub const CREATE: PermissionEntry = PermissionEntry::new("package:create", OWNER_AND_DELEGATE);
    pub const READ: PermissionEntry = PermissionEntry::new("package:read", EVERY_ROLE);
    pub const UPDATE: PermissionEntry = PermissionEntry::new("package:update", OWNER_AND_DELEGATE);
    pub const DELETE: PermissionEntry = PermissionEntry::new("package:delete", OWNER_AND_DELEGATE);
}

pub mod traveller {
    use super::*;

    pub const ADD: PermissionEntry = PermissionEntry::new("traveller:add", OWNER_AND_DELEGATE);
    pub const REMOVE: PermissionEntry =
        PermissionEntry::new("traveller:remove", OWNER_AND_DELEGATE);
    pub const UPDATE: PermissionEntry =
        PermissionEntry::new("traveller:update", OWNER_AND_DELEGATE);
}

pub mod destination {
    use super::*;

    pub const CREATE: PermissionEntry =
        PermissionEntry::new("destination:create", OWNER_AND_DELEGATE);
    pub const UPDATE: PermissionEntry =
        PermissionEntry::new("destination:update", OWNER_AND_DELEGATE);
    pub const DELETE: PermissionEntry =
        PermissionEntry::new("destination:delete", OWNER_AND_DELEGATE);
}

pub mod common {
    use super::*;

    pub const READ_COUNTRIES: PermissionEntry =
        PermissionEntry::new("countries:read", EVERY_ROLE);
    pub const SEARCH_CUSTOMER_USERNAME: PermissionEntry =
        PermissionEntry::new("search_username:read", OWNER_AND_DELEGATE);
    pub const SEARCH_CUSTOMER_EMAIL: PermissionEntry =
        PermissionEntry::new("search_email:read", OWNER_AND_DELEGATE);
    pub const GET_ALL_PERMISSIONS: PermissionEntry =
        PermissionEntry::new("permissions:read", OWNER_AND_DELEGATE);
}

pub mod agent_member {
    use super::*;

    pub const CREATE: PermissionEntry =
        PermissionEntry::new("agent_member:create", OWNER_AND_DELEGATE);
    pub const UPDATE: PermissionEntry =
        PermissionEntry::new("agent_member:update", OWNER_AND_DELEGATE);
    pub const DELETE: PermissionEntry =
        PermissionEntry::new("agent_member:delete", OWNER_AND_DELEGATE);
    pub const READ: PermissionEntry =
        PermissionEntry::new("agent_member:read", OWNER_AND_DELEGATE);
}

/// Every permission the service recognises.
pub const CATALOG: &[PermissionEntry] = &[
    package::CREATE,
    package::READ,
    package::UPDATE,
    package::DELETE,
    traveller::ADD,
    traveller::REMOVE,
    traveller::UPDATE,
    destination::CREATE,
    destination::UPDATE,
    destination::DELETE,
    common::READ_COUNTRIES,
    common::SEARCH_CUSTOMER_USERNAME,
    common::SEARCH_CUSTOMER_EMAIL,
    common::GET_ALL_PERMISSIONS,
    agent_member::CREATE,
    agent_member::UPDATE,
    agent_member::DELETE,
    agent_member::READ,
];

/// Every catalog key whose entry admits `role`.
///
/// Pure function of [`CATALOG`]; linear in the catalog size.
pub fn derive_permissions(role: Role) -> HashSet<PermissionKey> {
    CATALOG
        .iter()
        .filter(|entry| entry.allows_role(role))
        .map(PermissionEntry::permission_key)
        .collect()
}

/// Look up the catalog entry for a key.
pub fn lookup(key: &str) -> Option<&'static PermissionEntry> {
    CATALOG.iter().find(|entry| entry.key == key)
}

/// Whether an owner may hand `key` to one of their delegates.
///
/// The key must exist, the owner role must be able to hold it, and the
/// delegate role must be admitted by the entry.
pub fn owner_grantable(key: &str) -> bool {
    lookup(key).is_some_and(|entry| {
        entry.allows_role(Role::PrimaryOwner) && entry.allows_role(Role::Delegate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique_and_well_formed() {
        let mut seen = HashSet::new();
        for entry in CATALOG {
            assert!(seen.insert(entry.key), "duplicate key {}", entry.key);
            PermissionKey::parse(entry.key).expect("catalog key parses");
            assert!(!entry.allowed_roles.is_empty(), "{} has no roles", entry.key);
        }
    }

    #[test]
    fn derived_sets_are_catalog_subsets() {
        let catalog: HashSet<&str> = CATALOG.iter().map(|entry| entry.key).collect();
        for role in Role::ALL {
            for key in derive_permissions(role) {
                assert!(catalog.contains(key.as_str()));
            }
        }
    }

    #[test]
    fn derivation_is_stable() {
        for role in Role::ALL {
            assert_eq!(derive_permissions(role), derive_permissions(role));
        }
    }

    #[test]
    fn traveller_gets_read_only_rights() {
        let perms = derive_permissions(Role::EndUser);
        let mut keys: Vec<&str> = perms.iter().map(PermissionKey::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["countries:read", "package:read"]);
    }

    #[test]
    fn owner_gets_whole_catalog() {
        assert_eq!(derive_permissions(Role::PrimaryOwner).len(), CATALOG.len());
    }

    #[test]
    fn lookup_and_grantability() {
        assert_eq!(lookup("package:update"), Some(&package::UPDATE));
        assert!(lookup("package:archive").is_none());
        assert!(owner_grantable("traveller:add"));
        assert!(!owner_grantable("admin"));
    }
}
