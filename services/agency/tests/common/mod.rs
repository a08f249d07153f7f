use agency::app::{AppState, build_router};
use agency::existence::FilterConfig;
use agency::store::memory::InMemoryStore;
use agency::store::{AgencyStore, DelegateRecord, EndUserRecord, OwnerRecord};
use axum::body::Body;
use axum::routing::RouterIntoService;
use compass_authz::{CredentialClaims, CredentialVerifier, SubjectId};
use jsonwebtoken::{EncodingKey, Header};
use std::sync::Arc;
use std::time::Duration;

pub const SECRET: &[u8] = b"integration-secret";
pub const OWNER_ID: i64 = 1;
pub const SEARCH_DELEGATE_ID: i64 = 10;
pub const READ_ONLY_DELEGATE_ID: i64 = 11;
pub const TRAVELLER_ID: i64 = 100;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn token(role: &str, id: i64) -> String {
    let claims = CredentialClaims {
        role: role.to_string(),
        id,
        permissions: Vec::new(),
        iat: 1_700_000_000,
        exp: 4_000_000_000,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET))
        .expect("encode token")
}

pub fn bearer(role: &str, id: i64) -> String {
    format!("Bearer {}", token(role, id))
}

pub struct TestApp {
    pub app: RouterIntoService<Body, ()>,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
}

pub fn app_with_store<S>(store: Arc<S>) -> (RouterIntoService<Body, ()>, AppState)
where
    S: AgencyStore + 'static,
{
    let state = AppState::new(
        store,
        CredentialVerifier::from_secret(SECRET, 0),
        Duration::from_millis(500),
        FilterConfig {
            initial_capacity: 1_000,
            ..FilterConfig::default()
        },
    );
    (build_router(state.clone()).into_service(), state)
}

/// One agent with two agent members and a handful of travellers.
pub async fn seeded_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_owner(OwnerRecord {
            owner_id: SubjectId::new(OWNER_ID),
            email: "agent@example.com".to_string(),
        })
        .await
        .expect("owner");
    store
        .insert_delegate(DelegateRecord {
            delegate_id: SubjectId::new(SEARCH_DELEGATE_ID),
            parent_owner_id: SubjectId::new(OWNER_ID),
            username: "01HSEARCHER".to_string(),
            permissions: vec![
                "search_email:read".to_string(),
                "search_username:read".to_string(),
            ],
        })
        .await
        .expect("search delegate");
    store
        .insert_delegate(DelegateRecord {
            delegate_id: SubjectId::new(READ_ONLY_DELEGATE_ID),
            parent_owner_id: SubjectId::new(OWNER_ID),
            username: "01HREADER".to_string(),
            permissions: vec!["package:read".to_string()],
        })
        .await
        .expect("read-only delegate");
    for offset in 0..3 {
        store
            .insert_end_user(EndUserRecord {
                traveller_id: SubjectId::new(TRAVELLER_ID + offset),
                email: format!("traveller{offset}@example.com"),
                username: format!("traveller{offset}"),
            })
            .await
            .expect("traveller");
    }

    let (app, state) = app_with_store(store.clone());
    state.warm_filters().await.expect("warm filters");
    TestApp { app, state, store }
}
