//! Compass agency HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, the access gate, and existence filters, then
//! starts the API server and the metrics endpoint.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use agency::app::{AppState, build_router};
use agency::config::AgencyConfig;
use agency::observability;
use agency::store::memory::InMemoryStore;
use agency::store::seed::SeedData;
use anyhow::Context;
use compass_authz::CredentialVerifier;
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AgencyConfig::from_env_or_yaml().context("agency config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: AgencyConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("compass-agency");
    let state = build_state(&config).await?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    tracing::info!(%addr, "agency listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: &AgencyConfig) -> anyhow::Result<AppState> {
    let store = match &config.seed_path {
        Some(path) => {
            let seed = SeedData::from_path(path)?;
            InMemoryStore::from_seed(seed)
                .await
                .with_context(|| format!("apply seed: {path}"))?
        }
        None => InMemoryStore::new(),
    };
    let verifier = CredentialVerifier::from_secret(config.jwt_secret.as_bytes(), config.jwt_leeway_secs);
    let state = AppState::new(
        Arc::new(store),
        verifier,
        config.store_timeout,
        config.filter,
    );
    state.warm_filters().await.context("warm membership filters")?;
    tracing::info!(
        backend = state.store_backend,
        emails = state.emails.filter().len(),
        usernames = state.usernames.filter().len(),
        "agency state ready"
    );
    Ok(state)
}
