//! Permission catalog endpoint.
//!
//! Lists every key an agent holds, which is also the set it may hand to its
//! agent members when creating them.
use crate::api::error::ApiError;
use crate::api::types::PermissionsResponse;
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use compass_authz::catalog::{self, derive_permissions};
use compass_authz::{RequiredPermissions, Role};

pub(crate) async fn list_permissions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PermissionsResponse>, ApiError> {
    let required = RequiredPermissions::from(catalog::common::GET_ALL_PERMISSIONS);
    state.gate.check(&headers, &required).await?;

    let mut permissions: Vec<String> = derive_permissions(Role::PrimaryOwner)
        .into_iter()
        .map(|key| key.as_str().to_string())
        .collect();
    permissions.sort();
    Ok(Json(PermissionsResponse {
        role: Role::PrimaryOwner.to_string(),
        permissions,
    }))
}
