//! Trait abstraction for search index operations

use crate::provider::EntityRecord;
use crate::IndexAttributes;
use anyhow::Result;
use async_trait::async_trait;

/// Index metadata returned by the existence probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub uid: String,
}

/// Trait abstracting the search index gateway.
///
/// Every operation takes a logical index name; implementations resolve it
/// through an optional tenant prefix. This is the seam the synchronizer is
/// injected with, so tests can run against an in-memory implementation.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Create an index. Succeeds (eventually, via task) even if it already exists.
    async fn create_index(&self, index_name: &str, primary_key: Option<&str>) -> Result<()>;

    /// Existence probe — `Ok(None)` when the index does not exist
    async fn get_index(&self, index_name: &str) -> Result<Option<IndexInfo>>;

    /// Add entities as documents, applying the transform registered for
    /// `entity_type`. Upsert semantics: a document with an existing id
    /// replaces the previous one. Safe for any batch size including 1.
    async fn add_documents(
        &self,
        index_name: &str,
        records: &[EntityRecord],
        entity_type: &str,
    ) -> Result<()>;

    /// Run a query and return the raw hit list
    async fn search(&self, index_name: &str, query: &str) -> Result<Vec<serde_json::Value>>;

    /// Apply searchable/filterable/sortable attribute settings
    async fn update_settings(&self, index_name: &str, attributes: &IndexAttributes) -> Result<()>;

    /// Delete a single document by id
    async fn delete_document(&self, index_name: &str, document_id: &str) -> Result<()>;

    /// Delete every document in the index
    async fn delete_all_documents(&self, index_name: &str) -> Result<()>;
}
