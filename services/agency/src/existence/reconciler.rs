//! Exact bulk existence answers backed by a membership pre-filter.
//!
//! Filter-negative values are answered `exists: false` without touching the
//! store. Filter-positive values go to one batched store lookup, which is the
//! source of truth; false positives are resolved there.
use crate::existence::filter::ScalableBloomFilter;
use crate::store::{CandidateStore, LookupField, StoreResult};
use compass_authz::SubjectId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExistenceResult {
    pub exists: bool,
    #[serde(rename = "traveller_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<SubjectId>,
}

impl ExistenceResult {
    const ABSENT: Self = Self {
        exists: false,
        id: None,
    };

    fn present(id: SubjectId) -> Self {
        Self {
            exists: true,
            id: Some(id),
        }
    }
}

#[derive(Clone)]
pub struct ExistenceReconciler {
    field: LookupField,
    filter: Arc<ScalableBloomFilter>,
    store: Arc<dyn CandidateStore>,
}

impl ExistenceReconciler {
    pub fn new(
        field: LookupField,
        filter: Arc<ScalableBloomFilter>,
        store: Arc<dyn CandidateStore>,
    ) -> Self {
        Self {
            field,
            filter,
            store,
        }
    }

    pub fn field(&self) -> LookupField {
        self.field
    }

    pub fn filter(&self) -> &ScalableBloomFilter {
        &self.filter
    }

    /// Load every stored value for this field into the filter.
    pub async fn bootstrap(&self) -> StoreResult<usize> {
        let values = self.store.list_values(self.field).await?;
        self.filter.extend(&values);
        tracing::info!(
            field = self.field.as_str(),
            values = values.len(),
            layers = self.filter.layer_count(),
            "membership filter warmed"
        );
        Ok(values.len())
    }

    /// Register a value that was just persisted so later checks see it.
    ///
    /// The filter is only warmed once at startup; every path that creates a
    /// traveller after that must call this for each reconciler, or the new
    /// value will be reported as absent.
    pub fn record_created(&self, value: &str) {
        self.filter.insert(value);
        tracing::debug!(field = self.field.as_str(), "value added to membership filter");
    }

    /// Answer existence for every distinct value in `items`.
    ///
    /// # Errors
    /// Propagates the batched store lookup failure; no partial answer is
    /// returned.
    pub async fn check_existence(
        &self,
        items: &[String],
    ) -> StoreResult<BTreeMap<String, ExistenceResult>> {
        let field = self.field.as_str();
        metrics::counter!("compass_existence_checks_total", "field" => field).increment(1);

        let distinct: BTreeSet<&str> = items.iter().map(String::as_str).collect();
        let mut results = BTreeMap::new();
        let mut candidates = Vec::new();
        for value in distinct {
            if self.filter.may_contain(value) {
                candidates.push(value.to_string());
            } else {
                results.insert(value.to_string(), ExistenceResult::ABSENT);
            }
        }

        tracing::debug!(
            field,
            items = results.len() + candidates.len(),
            candidates = candidates.len(),
            "existence pre-filter"
        );
        if candidates.is_empty() {
            return Ok(results);
        }

        metrics::counter!("compass_existence_store_lookups_total", "field" => field).increment(1);
        let found: HashMap<String, SubjectId> = self
            .store
            .find_existing(self.field, &candidates)
            .await?
            .into_iter()
            .map(|hit| (hit.value, hit.id))
            .collect();

        for value in candidates {
            let result = match found.get(&value) {
                Some(id) => ExistenceResult::present(*id),
                None => ExistenceResult::ABSENT,
            };
            results.insert(value, result);
        }
        Ok(results)
    }
}
