//! In-memory mock implementation of SearchStore for testing without a real Meilisearch instance.

use super::traits::{IndexInfo, SearchStore};
use crate::provider::EntityRecord;
use crate::IndexAttributes;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::RwLock;

/// One recorded `add_documents` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddDocumentsCall {
    pub index_name: String,
    pub ids: Vec<String>,
    pub entity_type: String,
}

/// In-memory mock implementation of SearchStore for testing.
///
/// Stores documents per index behind an async `RwLock`, upserting by the
/// `id` field. Search uses simple substring matching over string fields.
/// `add_documents` and `search` calls are recorded so tests can assert the
/// idempotence and short-circuit properties of the synchronizer.
pub struct MockSearchStore {
    indexes: RwLock<HashMap<String, Vec<serde_json::Value>>>,
    add_calls: Mutex<Vec<AddDocumentsCall>>,
    search_calls: Mutex<Vec<(String, String)>>,
}

impl MockSearchStore {
    /// Create a mock with no indexes
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
            add_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
        }
    }

    /// Pre-create an empty index so the existence probe passes
    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.indexes.get_mut().insert(index_name.into(), Vec::new());
        self
    }

    /// Insert a document directly, bypassing call recording
    pub async fn seed_document(&self, index_name: &str, document: serde_json::Value) {
        let mut indexes = self.indexes.write().await;
        indexes
            .entry(index_name.to_string())
            .or_default()
            .push(document);
    }

    /// Documents currently held by an index
    pub async fn documents(&self, index_name: &str) -> Vec<serde_json::Value> {
        self.indexes
            .read()
            .await
            .get(index_name)
            .cloned()
            .unwrap_or_default()
    }

    /// All recorded `add_documents` calls, in order
    pub fn add_calls(&self) -> Vec<AddDocumentsCall> {
        self.add_calls.lock().unwrap().clone()
    }

    /// Number of `search` calls made so far
    pub fn search_call_count(&self) -> usize {
        self.search_calls.lock().unwrap().len()
    }
}

impl Default for MockSearchStore {
    fn default() -> Self {
        Self::new()
    }
}

/// True if any top-level string field of the document contains the query
fn document_matches(document: &serde_json::Value, query: &str) -> bool {
    match document {
        serde_json::Value::Object(fields) => fields
            .values()
            .any(|v| matches!(v, serde_json::Value::String(s) if s.contains(query))),
        _ => false,
    }
}

#[async_trait]
impl SearchStore for MockSearchStore {
    async fn create_index(&self, index_name: &str, _primary_key: Option<&str>) -> Result<()> {
        let mut indexes = self.indexes.write().await;
        indexes.entry(index_name.to_string()).or_default();
        Ok(())
    }

    async fn get_index(&self, index_name: &str) -> Result<Option<IndexInfo>> {
        let indexes = self.indexes.read().await;
        Ok(indexes.contains_key(index_name).then(|| IndexInfo {
            uid: index_name.to_string(),
        }))
    }

    async fn add_documents(
        &self,
        index_name: &str,
        records: &[EntityRecord],
        entity_type: &str,
    ) -> Result<()> {
        self.add_calls.lock().unwrap().push(AddDocumentsCall {
            index_name: index_name.to_string(),
            ids: records.iter().map(|r| r.id.clone()).collect(),
            entity_type: entity_type.to_string(),
        });

        let mut indexes = self.indexes.write().await;
        let documents = indexes.entry(index_name.to_string()).or_default();
        for record in records {
            let Ok(document) = serde_json::to_value(record) else {
                bail!("unserializable entity {}", record.id);
            };
            match documents
                .iter_mut()
                .find(|d| d.get("id") == Some(&serde_json::Value::String(record.id.clone())))
            {
                Some(existing) => *existing = document,
                None => documents.push(document),
            }
        }
        Ok(())
    }

    async fn search(&self, index_name: &str, query: &str) -> Result<Vec<serde_json::Value>> {
        self.search_calls
            .lock()
            .unwrap()
            .push((index_name.to_string(), query.to_string()));

        let indexes = self.indexes.read().await;
        let hits = indexes
            .get(index_name)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| document_matches(d, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(hits)
    }

    async fn update_settings(&self, _index_name: &str, _attributes: &IndexAttributes) -> Result<()> {
        Ok(())
    }

    async fn delete_document(&self, index_name: &str, document_id: &str) -> Result<()> {
        let mut indexes = self.indexes.write().await;
        if let Some(documents) = indexes.get_mut(index_name) {
            documents
                .retain(|d| d.get("id") != Some(&serde_json::Value::String(document_id.into())));
        }
        Ok(())
    }

    async fn delete_all_documents(&self, index_name: &str) -> Result<()> {
        let mut indexes = self.indexes.write().await;
        if let Some(documents) = indexes.get_mut(index_name) {
            documents.clear();
        }
        Ok(())
    }
}
