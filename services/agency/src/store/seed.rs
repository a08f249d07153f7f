//! Seed data for the in-memory backend.
//!
//! # Purpose
//! Lets the binary start with a known set of agents, agent members, and
//! travellers loaded from a YAML file (`COMPASS_SEED`).
use super::{DelegateRecord, EndUserRecord, OwnerRecord};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub owners: Vec<OwnerRecord>,
    #[serde(default)]
    pub delegates: Vec<DelegateRecord>,
    #[serde(default)]
    pub travellers: Vec<EndUserRecord>,
}

impl SeedData {
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).with_context(|| "parse seed yaml")
    }

    pub fn from_path(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| format!("read seed: {path}"))?;
        Self::from_yaml(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use crate::store::PrincipalStore;
    use compass_authz::SubjectId;

    const SEED: &str = r#"
owners:
  - owner_id: 1
    email: agent@example.com
delegates:
  - delegate_id: 10
    parent_owner_id: 1
    username: 01HZMEMBER
    permissions: ["package:read", "package:update"]
travellers:
  - traveller_id: 100
    email: traveller@example.com
    username: trav
"#;

    #[tokio::test]
    async fn seed_yaml_populates_store() {
        let seed = SeedData::from_yaml(SEED).expect("seed");
        assert_eq!(seed.owners.len(), 1);
        let store = InMemoryStore::from_seed(seed).await.expect("store");
        let delegate = store
            .find_delegate(SubjectId::new(10))
            .await
            .expect("lookup")
            .expect("delegate");
        assert_eq!(delegate.parent_owner_id, SubjectId::new(1));
        assert_eq!(delegate.permissions.len(), 2);
        assert!(
            store
                .find_end_user(SubjectId::new(100))
                .await
                .expect("lookup")
                .is_some()
        );
    }

    #[test]
    fn empty_seed_is_valid() {
        let seed = SeedData::from_yaml("{}").expect("seed");
        assert!(seed.owners.is_empty() && seed.delegates.is_empty() && seed.travellers.is_empty());
    }

    #[test]
    fn missing_seed_file_errors() {
        let err = SeedData::from_path("/nonexistent/compass-seed.yaml").expect_err("missing");
        assert!(err.to_string().contains("read seed"));
    }
}
