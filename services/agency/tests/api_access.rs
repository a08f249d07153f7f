mod common;

use agency::store::{
    AgencyStore, CandidateStore, DelegateRecord, EndUserRecord, ExistingCandidate, LookupField,
    OwnerRecord, PrincipalStore, StoreError, StoreResult,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use common::{
    OWNER_ID, READ_ONLY_DELEGATE_ID, SEARCH_DELEGATE_ID, TRAVELLER_ID, bearer, read_json,
    seeded_app,
};
use compass_authz::SubjectId;
use http_helpers::{get_request, json_request};
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn health_needs_no_credential() {
    let test = seeded_app().await;
    let response = test
        .app
        .clone()
        .oneshot(get_request("/v1/system/health", None))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["store_backend"], "memory");
}

#[tokio::test]
async fn owner_lists_grantable_permissions() {
    let test = seeded_app().await;
    let auth = bearer("agent", OWNER_ID);
    let response = test
        .app
        .clone()
        .oneshot(get_request("/v1/permissions", Some(&auth)))
        .await
        .expect("permissions");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(payload["role"], "agent");
    let keys: Vec<&str> = payload["permissions"]
        .as_array()
        .expect("array")
        .iter()
        .map(|value| value.as_str().expect("string"))
        .collect();
    assert_eq!(keys.len(), 18);
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(keys.contains(&"agent_member:create"));
}

#[tokio::test]
async fn delegate_without_key_gets_generic_forbidden() {
    let test = seeded_app().await;
    let auth = bearer("agent_member", READ_ONLY_DELEGATE_ID);
    let response = test
        .app
        .clone()
        .oneshot(get_request("/v1/permissions", Some(&auth)))
        .await
        .expect("permissions");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let payload = read_json(response).await;
    assert_eq!(payload["code"], "forbidden");
    assert_eq!(payload["message"], "Forbidden");
    assert!(!payload.to_string().contains("permissions:read"));
}

#[tokio::test]
async fn traveller_is_outside_role_ceiling() {
    let test = seeded_app().await;
    let auth = bearer("traveller", TRAVELLER_ID);
    let response = test
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/travellers/email-check",
            Some(&auth),
            serde_json::json!({ "emails": ["traveller1@example.com"] }),
        ))
        .await
        .expect("email check");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_or_malformed_credential_is_unauthorized() {
    let test = seeded_app().await;
    for auth in [None, Some("Bearer not-a-token"), Some("Basic YWdlbnQ6cHc=")] {
        let response = test
            .app
            .clone()
            .oneshot(get_request("/v1/permissions", auth))
            .await
            .expect("permissions");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{auth:?}");
        let payload = read_json(response).await;
        assert_eq!(payload["message"], "Unauthorized");
    }
}

#[tokio::test]
async fn deleted_owner_token_stops_working() {
    let test = seeded_app().await;
    let owner = bearer("agent", OWNER_ID);
    let delegate = bearer("agent_member", SEARCH_DELEGATE_ID);

    test.store
        .remove_owner(SubjectId::new(OWNER_ID))
        .await
        .expect("remove owner");

    for auth in [owner, delegate] {
        let response = test
            .app
            .clone()
            .oneshot(get_request("/v1/permissions", Some(&auth)))
            .await
            .expect("permissions");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn unknown_role_claim_is_forbidden() {
    let test = seeded_app().await;
    let auth = bearer("admin", OWNER_ID);
    let response = test
        .app
        .clone()
        .oneshot(get_request("/v1/permissions", Some(&auth)))
        .await
        .expect("permissions");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

struct UnreachableStore;

#[async_trait]
impl PrincipalStore for UnreachableStore {
    async fn find_owner(&self, _: SubjectId) -> StoreResult<Option<OwnerRecord>> {
        Err(StoreError::Unexpected(anyhow::anyhow!("db host unreachable")))
    }

    async fn find_delegate(&self, _: SubjectId) -> StoreResult<Option<DelegateRecord>> {
        Err(StoreError::Unexpected(anyhow::anyhow!("db host unreachable")))
    }

    async fn find_end_user(&self, _: SubjectId) -> StoreResult<Option<EndUserRecord>> {
        Err(StoreError::Unexpected(anyhow::anyhow!("db host unreachable")))
    }
}

#[async_trait]
impl CandidateStore for UnreachableStore {
    async fn find_existing(
        &self,
        _: LookupField,
        _: &[String],
    ) -> StoreResult<Vec<ExistingCandidate>> {
        Err(StoreError::Unexpected(anyhow::anyhow!("db host unreachable")))
    }

    async fn list_values(&self, _: LookupField) -> StoreResult<Vec<String>> {
        Ok(Vec::new())
    }
}

impl AgencyStore for UnreachableStore {
    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}

#[tokio::test]
async fn store_outage_is_unavailable_never_allowed() {
    let (app, _) = common::app_with_store(Arc::new(UnreachableStore));
    let auth = bearer("agent", OWNER_ID);
    let response = app
        .oneshot(get_request("/v1/permissions", Some(&auth)))
        .await
        .expect("permissions");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "unavailable");
    assert!(!payload.to_string().contains("unreachable"));
}
