use crate::{PermissionKey, Principal, RequiredPermissions};

/// Outcome of evaluating a route's requirements against a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    /// Every unsatisfied key, in requirement order. Diagnostics only; never
    /// shown to the caller.
    Denied { missing: Vec<PermissionKey> },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Decide whether `principal` satisfies every entry in `required`.
///
/// An entry is satisfied only when the principal's role is admitted by the
/// entry's `allowed_roles` and the principal actually holds the key. The role
/// check caps delegates at the route's ceiling; the possession check caps them
/// at what their owner granted. All entries are evaluated so the denial lists
/// every missing key.
pub fn authorize(principal: &Principal, required: &RequiredPermissions) -> Decision {
    let missing: Vec<PermissionKey> = required
        .entries()
        .iter()
        .filter(|entry| !(entry.allows_role(principal.role) && principal.holds(entry.key)))
        .map(|entry| entry.permission_key())
        .collect();

    if missing.is_empty() {
        Decision::Allowed
    } else {
        Decision::Denied { missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, derive_permissions};
    use crate::{PermissionEntry, Role, SubjectId};

    fn principal(role: Role, keys: &[&str]) -> Principal {
        Principal {
            role,
            subject_id: SubjectId::new(10),
            effective_owner_id: SubjectId::new(1),
            permissions: keys
                .iter()
                .map(|key| PermissionKey::parse(key).expect("key"))
                .collect(),
        }
    }

    fn missing_keys(decision: Decision) -> Vec<String> {
        match decision {
            Decision::Allowed => Vec::new(),
            Decision::Denied { missing } => missing.into_iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn owner_with_derived_permissions_is_allowed() {
        let owner = Principal {
            role: Role::PrimaryOwner,
            subject_id: SubjectId::new(1),
            effective_owner_id: SubjectId::new(1),
            permissions: derive_permissions(Role::PrimaryOwner),
        };
        let required = RequiredPermissions::new([catalog::package::UPDATE, catalog::traveller::ADD]);
        assert_eq!(authorize(&owner, &required), Decision::Allowed);
    }

    #[test]
    fn delegate_without_key_is_denied() {
        let delegate = principal(Role::Delegate, &["package:read"]);
        let decision = authorize(&delegate, &catalog::package::UPDATE.into());
        assert_eq!(missing_keys(decision), vec!["package:update"]);
    }

    #[test]
    fn role_ceiling_applies_even_when_key_is_held() {
        let delegate = principal(Role::Delegate, &["package:update"]);
        let owner_only = PermissionEntry::new("package:update", &[Role::PrimaryOwner]);
        let decision = authorize(&delegate, &owner_only.into());
        assert!(!decision.is_allowed());
        assert_eq!(missing_keys(decision), vec!["package:update"]);
    }

    #[test]
    fn traveller_cannot_use_owner_routes() {
        let traveller = principal(Role::EndUser, &["package:read", "package:update"]);
        assert!(!authorize(&traveller, &catalog::package::UPDATE.into()).is_allowed());
        assert!(authorize(&traveller, &catalog::package::READ.into()).is_allowed());
    }

    #[test]
    fn denial_reports_every_missing_key() {
        let delegate = principal(Role::Delegate, &["traveller:add"]);
        let required = RequiredPermissions::new([
            catalog::package::CREATE,
            catalog::traveller::ADD,
            catalog::destination::DELETE,
        ]);
        assert_eq!(
            missing_keys(authorize(&delegate, &required)),
            vec!["package:create", "destination:delete"]
        );
    }

    #[test]
    fn removing_any_single_key_flips_to_denied() {
        let required = RequiredPermissions::new([
            catalog::package::READ,
            catalog::package::UPDATE,
            catalog::common::READ_COUNTRIES,
        ]);
        let all = ["package:read", "package:update", "countries:read"];
        assert!(authorize(&principal(Role::Delegate, &all), &required).is_allowed());

        for skip in 0..all.len() {
            let held: Vec<&str> = all
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != skip)
                .map(|(_, key)| *key)
                .collect();
            let decision = authorize(&principal(Role::Delegate, &held), &required);
            assert_eq!(missing_keys(decision), vec![all[skip]]);
        }
    }

    #[test]
    fn empty_requirements_allow() {
        let traveller = principal(Role::EndUser, &[]);
        assert!(authorize(&traveller, &RequiredPermissions::default()).is_allowed());
    }
}
