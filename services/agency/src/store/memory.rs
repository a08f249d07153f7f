//! In-memory implementation of the agency store.
//!
//! # Purpose
//! Implements [`PrincipalStore`] and [`CandidateStore`] with `HashMap`s guarded
//! by `tokio::sync::RwLock`. It backs local development, the seeded demo
//! binary, and tests.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: write locks for mutations, read locks for
//!   lookups.
//!
//! # Mutations
//! Entity CRUD is not part of the store traits. The inherent `insert_*` and
//! `remove_*` methods exist so seeding and tests can create and revoke
//! subjects; removal is how a revoked or deleted account is modelled.
use super::{
    AgencyStore, CandidateStore, DelegateRecord, EndUserRecord, ExistingCandidate, LookupField,
    OwnerRecord, PrincipalStore, StoreError, StoreResult,
};
use crate::store::seed::SeedData;
use async_trait::async_trait;
use compass_authz::SubjectId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStore {
    /// Agents keyed by `owner_id`.
    owners: Arc<RwLock<HashMap<SubjectId, OwnerRecord>>>,
    /// Agent members keyed by `delegate_id`.
    delegates: Arc<RwLock<HashMap<SubjectId, DelegateRecord>>>,
    /// Travellers keyed by `traveller_id`.
    travellers: Arc<RwLock<HashMap<SubjectId, EndUserRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated from seed data.
    ///
    /// # Errors
    /// - [`StoreError::Conflict`] on duplicate ids or unique values.
    /// - [`StoreError::NotFound`] if a delegate references a missing owner.
    pub async fn from_seed(seed: SeedData) -> StoreResult<Self> {
        let store = Self::new();
        for owner in seed.owners {
            store.insert_owner(owner).await?;
        }
        for delegate in seed.delegates {
            store.insert_delegate(delegate).await?;
        }
        for traveller in seed.travellers {
            store.insert_end_user(traveller).await?;
        }
        Ok(store)
    }

    pub async fn insert_owner(&self, owner: OwnerRecord) -> StoreResult<OwnerRecord> {
        let mut owners = self.owners.write().await;
        if owners.contains_key(&owner.owner_id) {
            return Err(StoreError::Conflict("owner exists".into()));
        }
        owners.insert(owner.owner_id, owner.clone());
        Ok(owner)
    }

    pub async fn insert_delegate(&self, delegate: DelegateRecord) -> StoreResult<DelegateRecord> {
        // Delegates must hang off a live owner.
        if !self
            .owners
            .read()
            .await
            .contains_key(&delegate.parent_owner_id)
        {
            return Err(StoreError::NotFound("parent owner not found".into()));
        }
        let mut delegates = self.delegates.write().await;
        if delegates.contains_key(&delegate.delegate_id) {
            return Err(StoreError::Conflict("delegate exists".into()));
        }
        delegates.insert(delegate.delegate_id, delegate.clone());
        Ok(delegate)
    }

    /// Insert a traveller.
    ///
    /// This does not touch the existence filters. Callers creating travellers
    /// after startup must also call `ExistenceReconciler::record_created` for
    /// the email and username.
    pub async fn insert_end_user(&self, traveller: EndUserRecord) -> StoreResult<EndUserRecord> {
        let mut travellers = self.travellers.write().await;
        if travellers.contains_key(&traveller.traveller_id) {
            return Err(StoreError::Conflict("traveller exists".into()));
        }
        if travellers
            .values()
            .any(|existing| existing.email == traveller.email)
        {
            return Err(StoreError::Conflict("traveller email exists".into()));
        }
        if travellers
            .values()
            .any(|existing| existing.username == traveller.username)
        {
            return Err(StoreError::Conflict("traveller username exists".into()));
        }
        travellers.insert(traveller.traveller_id, traveller.clone());
        metrics::gauge!("compass_travellers_total").set(travellers.len() as f64);
        Ok(traveller)
    }

    /// Remove an owner along with every delegate acting for it.
    pub async fn remove_owner(&self, owner_id: SubjectId) -> StoreResult<()> {
        let mut owners = self.owners.write().await;
        if owners.remove(&owner_id).is_none() {
            return Err(StoreError::NotFound("owner not found".into()));
        }
        self.delegates
            .write()
            .await
            .retain(|_, delegate| delegate.parent_owner_id != owner_id);
        Ok(())
    }

    pub async fn remove_delegate(&self, delegate_id: SubjectId) -> StoreResult<()> {
        match self.delegates.write().await.remove(&delegate_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("delegate not found".into())),
        }
    }

    pub async fn remove_end_user(&self, traveller_id: SubjectId) -> StoreResult<()> {
        let mut travellers = self.travellers.write().await;
        if travellers.remove(&traveller_id).is_none() {
            return Err(StoreError::NotFound("traveller not found".into()));
        }
        metrics::gauge!("compass_travellers_total").set(travellers.len() as f64);
        Ok(())
    }
}

#[async_trait]
impl PrincipalStore for InMemoryStore {
    async fn find_owner(&self, owner_id: SubjectId) -> StoreResult<Option<OwnerRecord>> {
        Ok(self.owners.read().await.get(&owner_id).cloned())
    }

    async fn find_delegate(&self, delegate_id: SubjectId) -> StoreResult<Option<DelegateRecord>> {
        Ok(self.delegates.read().await.get(&delegate_id).cloned())
    }

    async fn find_end_user(&self, traveller_id: SubjectId) -> StoreResult<Option<EndUserRecord>> {
        Ok(self.travellers.read().await.get(&traveller_id).cloned())
    }
}

#[async_trait]
impl CandidateStore for InMemoryStore {
    async fn find_existing(
        &self,
        field: LookupField,
        candidates: &[String],
    ) -> StoreResult<Vec<ExistingCandidate>> {
        let wanted: HashSet<&str> = candidates.iter().map(String::as_str).collect();
        let travellers = self.travellers.read().await;
        Ok(travellers
            .values()
            .filter(|record| wanted.contains(field.value_of(record)))
            .map(|record| ExistingCandidate {
                value: field.value_of(record).to_string(),
                id: record.traveller_id,
            })
            .collect())
    }

    async fn list_values(&self, field: LookupField) -> StoreResult<Vec<String>> {
        Ok(self
            .travellers
            .read()
            .await
            .values()
            .map(|record| field.value_of(record).to_string())
            .collect())
    }
}

impl AgencyStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
