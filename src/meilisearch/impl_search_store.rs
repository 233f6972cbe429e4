//! SearchStore trait implementation for MeiliClient
//!
//! Each trait method delegates directly to the corresponding inherent method
//! on `MeiliClient`.

use anyhow::Result;
use async_trait::async_trait;

use super::client::MeiliClient;
use super::traits::{IndexInfo, SearchStore};
use crate::provider::EntityRecord;
use crate::IndexAttributes;

#[async_trait]
impl SearchStore for MeiliClient {
    async fn create_index(&self, index_name: &str, primary_key: Option<&str>) -> Result<()> {
        self.create_index(index_name, primary_key).await
    }

    async fn get_index(&self, index_name: &str) -> Result<Option<IndexInfo>> {
        self.get_index(index_name).await
    }

    async fn add_documents(
        &self,
        index_name: &str,
        records: &[EntityRecord],
        entity_type: &str,
    ) -> Result<()> {
        self.add_documents(index_name, records, entity_type).await
    }

    async fn search(&self, index_name: &str, query: &str) -> Result<Vec<serde_json::Value>> {
        self.search(index_name, query).await
    }

    async fn update_settings(&self, index_name: &str, attributes: &IndexAttributes) -> Result<()> {
        self.update_settings(index_name, attributes).await
    }

    async fn delete_document(&self, index_name: &str, document_id: &str) -> Result<()> {
        self.delete_document(index_name, document_id).await
    }

    async fn delete_all_documents(&self, index_name: &str) -> Result<()> {
        self.delete_all_documents(index_name).await
    }
}
