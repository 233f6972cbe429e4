//! In-memory mock implementation of EntityProvider for testing without a host platform.

use super::traits::{EntityProvider, EntityRecord, EntitySelector, ListOptions, SortOrder};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory mock provider.
///
/// Serves records from a `Vec`, honoring selector, ordering, and `take`
/// exactly as the provider contract requires. Every `list` call is recorded
/// so tests can assert cursor progression, and the provider can be primed
/// to fail.
pub struct MockEntityProvider {
    records: Vec<EntityRecord>,
    calls: Mutex<Vec<(EntitySelector, ListOptions)>>,
    fail_with: Option<String>,
}

impl MockEntityProvider {
    /// Create a mock serving the given records
    pub fn new(records: Vec<EntityRecord>) -> Self {
        Self {
            records,
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    /// Create a mock whose every `list` call fails with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    /// All recorded `list` calls, in order
    pub fn calls(&self) -> Vec<(EntitySelector, ListOptions)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `list` calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EntityProvider for MockEntityProvider {
    async fn list(
        &self,
        selector: &EntitySelector,
        options: &ListOptions,
    ) -> Result<Vec<EntityRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push((selector.clone(), options.clone()));

        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }

        let mut results: Vec<EntityRecord> = self
            .records
            .iter()
            .filter(|r| match selector {
                EntitySelector::ById(id) => &r.id == id,
                EntitySelector::IdGreaterThan(bound) => r.id.as_str() > bound.as_str(),
            })
            .cloned()
            .collect();

        match options.order {
            SortOrder::IdAsc => results.sort_by(|a, b| a.id.cmp(&b.id)),
            SortOrder::IdDesc => results.sort_by(|a, b| b.id.cmp(&a.id)),
        }
        results.truncate(options.take);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[&str]) -> Vec<EntityRecord> {
        ids.iter().map(|id| EntityRecord::new(*id)).collect()
    }

    #[tokio::test]
    async fn test_exact_id_match() {
        let provider = MockEntityProvider::new(records(&["a", "b", "c"]));
        let found = provider
            .list(&EntitySelector::ById("b".into()), &ListOptions::ascending(1))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "b");
    }

    #[tokio::test]
    async fn test_greater_than_is_exclusive() {
        let provider = MockEntityProvider::new(records(&["1", "2", "3"]));
        let found = provider
            .list(
                &EntitySelector::IdGreaterThan("1".into()),
                &ListOptions::ascending(10),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[tokio::test]
    async fn test_descending_take_one_returns_newest() {
        let provider = MockEntityProvider::new(records(&["1", "3", "2"]));
        let found = provider
            .list(
                &EntitySelector::IdGreaterThan(String::new()),
                &ListOptions {
                    relations: Vec::new(),
                    take: 1,
                    order: SortOrder::IdDesc,
                },
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let provider = MockEntityProvider::failing("connection refused");
        let result = provider
            .list(
                &EntitySelector::IdGreaterThan(String::new()),
                &ListOptions::ascending(10),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(provider.call_count(), 1);
    }
}
