//! Request access gate.
//!
//! # Purpose
//! The boundary protected handlers call before doing any work: extracts the
//! bearer credential, verifies it, resolves the principal under a time bound,
//! and evaluates the route's required permissions.
//!
//! # Security considerations
//! - Missing keys are logged for diagnostics and never returned to callers.
//! - A timed-out or failed store lookup is `StoreUnavailable`, never an allow.
use crate::auth::error::AccessError;
use crate::auth::resolver::IdentityResolver;
use axum::http::HeaderMap;
use compass_authz::{CredentialVerifier, Decision, Principal, RequiredPermissions, authorize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<CredentialVerifier>,
    resolver: IdentityResolver,
    store_timeout: Duration,
}

impl AccessGate {
    pub fn new(
        verifier: Arc<CredentialVerifier>,
        resolver: IdentityResolver,
        store_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            resolver,
            store_timeout,
        }
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Admit a request carrying `headers` if it satisfies `required`.
    ///
    /// # Errors
    /// - [`AccessError::Unauthenticated`] for a missing, invalid, or stale
    ///   credential.
    /// - [`AccessError::Forbidden`] for an unknown role or missing permission.
    /// - [`AccessError::StoreUnavailable`] if the liveness lookup fails or
    ///   exceeds the store timeout.
    pub async fn check(
        &self,
        headers: &HeaderMap,
        required: &RequiredPermissions,
    ) -> Result<Principal, AccessError> {
        let result = self.admit(headers, required).await;
        let outcome = match &result {
            Ok(_) => "allowed",
            Err(err) => err.outcome(),
        };
        metrics::counter!("compass_authz_decisions_total", "outcome" => outcome).increment(1);
        result
    }

    async fn admit(
        &self,
        headers: &HeaderMap,
        required: &RequiredPermissions,
    ) -> Result<Principal, AccessError> {
        let bearer = extract_bearer(headers)
            .ok_or(AccessError::Unauthenticated("missing bearer token"))?;
        let credential = self.verifier.verify(bearer).map_err(|err| {
            tracing::debug!(error = %err, "bearer token rejected");
            AccessError::Unauthenticated("invalid token")
        })?;

        let principal = match tokio::time::timeout(
            self.store_timeout,
            self.resolver.resolve(&credential.role, credential.subject_id),
        )
        .await
        {
            Ok(resolved) => resolved?,
            Err(_) => {
                tracing::error!(
                    subject_id = %credential.subject_id,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "principal lookup timed out"
                );
                return Err(AccessError::StoreUnavailable(
                    "principal lookup timed out".to_string(),
                ));
            }
        };

        match authorize(&principal, required) {
            Decision::Allowed => Ok(principal),
            Decision::Denied { missing } => {
                let missing: Vec<&str> = missing.iter().map(|key| key.as_str()).collect();
                tracing::warn!(
                    subject_id = %principal.subject_id,
                    role = %principal.role,
                    ?missing,
                    "request denied"
                );
                Err(AccessError::Forbidden("missing permission"))
            }
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = value.to_str().ok()?;
    value.strip_prefix("Bearer ").filter(|token| !token.is_empty())
}
