//! Per-entity-type document transformation

use crate::provider::EntityRecord;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps an entity record to the document shape submitted to the index
pub type DocumentTransformer = Arc<dyn Fn(&EntityRecord) -> serde_json::Value + Send + Sync>;

/// Registry of document transformers keyed by entity-type tag.
///
/// The gateway resolves the transformer by the `entity_type` passed to
/// `add_documents`; unregistered tags fall back to plain serialization of
/// the record.
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    transformers: HashMap<String, DocumentTransformer>,
}

impl TransformerRegistry {
    /// Create an empty registry (every entity type serializes as-is)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transformer for an entity-type tag, replacing any previous one
    pub fn register<F>(&mut self, entity_type: impl Into<String>, transformer: F)
    where
        F: Fn(&EntityRecord) -> serde_json::Value + Send + Sync + 'static,
    {
        self.transformers
            .insert(entity_type.into(), Arc::new(transformer));
    }

    /// Transform a batch of records for the given entity type
    pub fn apply(
        &self,
        entity_type: &str,
        records: &[EntityRecord],
    ) -> Result<Vec<serde_json::Value>> {
        match self.transformers.get(entity_type) {
            Some(transformer) => Ok(records.iter().map(|r| transformer(r)).collect()),
            None => records
                .iter()
                .map(|r| {
                    serde_json::to_value(r)
                        .with_context(|| format!("Failed to serialize entity {}", r.id))
                })
                .collect(),
        }
    }
}
