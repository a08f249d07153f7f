//! Compass authorization primitives shared by the agency service and its tests.
//!
//! # Purpose
//! Centralizes the permission catalog, the role model, the resolved principal
//! type, the allow/deny guard, and bearer-credential verification.
//!
//! # How it fits
//! The agency service verifies a bearer credential with [`CredentialVerifier`],
//! resolves it against its store into a [`Principal`], then calls
//! [`authorize`] with the route's [`RequiredPermissions`]. Everything here is
//! pure apart from token decoding; store access lives in the service.
//!
//! # Key invariants
//! - Permission keys follow the `resource:action` pattern.
//! - Role-derived permission sets are subsets of [`catalog::CATALOG`].
//! - The guard requires both role admission and key possession.
//!
//! # Examples
//! ```rust
//! use compass_authz::catalog::{self, derive_permissions};
//! use compass_authz::{Decision, Principal, Role, SubjectId, authorize};
//!
//! let owner = Principal {
//!     role: Role::PrimaryOwner,
//!     subject_id: SubjectId::new(1),
//!     effective_owner_id: SubjectId::new(1),
//!     permissions: derive_permissions(Role::PrimaryOwner),
//! };
//! assert_eq!(authorize(&owner, &catalog::package::CREATE.into()), Decision::Allowed);
//! ```
//!
//! # Common pitfalls
//! - Trusting the `permissions` claim in a token; it may be stale.
//! - Comparing resource ownership against `subject_id` instead of
//!   `effective_owner_id`.

pub mod catalog;
mod errors;
mod guard;
mod permission;
mod principal;
mod role;
mod token;

pub use errors::{AuthzError, AuthzResult};
pub use guard::{Decision, authorize};
pub use permission::{PermissionEntry, PermissionKey, RequiredPermissions};
pub use principal::{Principal, SubjectId};
pub use role::Role;
pub use token::{Credential, CredentialClaims, CredentialVerifier};
