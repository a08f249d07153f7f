//! Agency HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and testable.
use crate::api;
use crate::auth::{AccessGate, IdentityResolver};
use crate::existence::{ExistenceReconciler, FilterConfig, ScalableBloomFilter};
use crate::store::{AgencyStore, CandidateStore, LookupField, PrincipalStore};
use axum::Router;
use compass_authz::CredentialVerifier;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub gate: AccessGate,
    pub emails: Arc<ExistenceReconciler>,
    pub usernames: Arc<ExistenceReconciler>,
    pub store_backend: &'static str,
}

impl AppState {
    /// Wire the gate and both existence reconcilers over one store.
    ///
    /// Filters start empty; call [`AppState::warm_filters`] before serving.
    pub fn new<S>(
        store: Arc<S>,
        verifier: CredentialVerifier,
        store_timeout: Duration,
        filter: FilterConfig,
    ) -> Self
    where
        S: AgencyStore + 'static,
    {
        let principals: Arc<dyn PrincipalStore> = store.clone();
        let candidates: Arc<dyn CandidateStore> = store.clone();
        let reconciler = |field| {
            Arc::new(ExistenceReconciler::new(
                field,
                Arc::new(ScalableBloomFilter::new(filter)),
                candidates.clone(),
            ))
        };
        Self {
            gate: AccessGate::new(
                Arc::new(verifier),
                IdentityResolver::new(principals),
                store_timeout,
            ),
            emails: reconciler(LookupField::Email),
            usernames: reconciler(LookupField::Username),
            store_backend: store.backend_name(),
        }
    }

    /// Load existing traveller emails and usernames into the filters.
    pub async fn warm_filters(&self) -> anyhow::Result<()> {
        self.emails.bootstrap().await?;
        self.usernames.bootstrap().await?;
        Ok(())
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/permissions",
            axum::routing::get(api::permissions::list_permissions),
        )
        .route(
            "/v1/travellers/email-check",
            axum::routing::post(api::existence::check_emails),
        )
        .route(
            "/v1/travellers/username-check",
            axum::routing::post(api::existence::check_usernames),
        )
        .layer(trace_layer)
        .with_state(state)
}
