//! Traveller existence check handlers.
//!
//! # Purpose and responsibility
//! Let agents and agent members ask which of a batch of emails or usernames
//! already belong to a traveller, without one store round trip per value.
//!
//! # Key invariants and assumptions
//! - Access is checked before the store or filter is consulted.
//! - Answers are exact; the membership filter only decides what reaches the
//!   store.
//! - The whole check, store lookup included, is bounded by the store timeout.
//!   A failed or timed-out lookup is a 503, same as in the access gate.
use crate::api::error::{
    ApiError, api_store_unavailable, api_unavailable, api_validation_error,
};
use crate::api::types::{EmailCheckRequest, ExistenceResponse, UsernameCheckRequest};
use crate::app::AppState;
use crate::existence::ExistenceReconciler;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use compass_authz::RequiredPermissions;
use compass_authz::catalog::common::{SEARCH_CUSTOMER_EMAIL, SEARCH_CUSTOMER_USERNAME};

pub(crate) async fn check_emails(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EmailCheckRequest>,
) -> Result<Json<ExistenceResponse>, ApiError> {
    state
        .gate
        .check(&headers, &RequiredPermissions::from(SEARCH_CUSTOMER_EMAIL))
        .await?;
    if body.emails.is_empty() {
        return Err(api_validation_error("emails must not be empty"));
    }
    reconcile(&state, &state.emails, &body.emails).await
}

pub(crate) async fn check_usernames(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UsernameCheckRequest>,
) -> Result<Json<ExistenceResponse>, ApiError> {
    state
        .gate
        .check(&headers, &RequiredPermissions::from(SEARCH_CUSTOMER_USERNAME))
        .await?;
    if body.usernames.is_empty() {
        return Err(api_validation_error("usernames must not be empty"));
    }
    reconcile(&state, &state.usernames, &body.usernames).await
}

async fn reconcile(
    state: &AppState,
    reconciler: &ExistenceReconciler,
    items: &[String],
) -> Result<Json<ExistenceResponse>, ApiError> {
    let timeout = state.gate.store_timeout();
    match tokio::time::timeout(timeout, reconciler.check_existence(items)).await {
        Ok(Ok(results)) => Ok(Json(results)),
        Ok(Err(err)) => Err(api_store_unavailable(&err)),
        Err(_) => {
            tracing::error!(
                field = reconciler.field().as_str(),
                timeout_ms = timeout.as_millis() as u64,
                "existence lookup timed out"
            );
            Err(api_unavailable("Service unavailable"))
        }
    }
}
