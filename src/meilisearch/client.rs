//! Meilisearch client for index and document operations

use super::traits::IndexInfo;
use super::transform::TransformerRegistry;
use crate::provider::EntityRecord;
use crate::{IndexAttributes, IndexYamlConfig};
use anyhow::{Context, Result};
use meilisearch_sdk::{
    client::Client,
    errors::{Error as MeiliError, ErrorCode, MeilisearchError},
    search::SearchResults,
    settings::Settings,
};
use std::collections::HashMap;

/// Client for Meilisearch operations.
///
/// Logical index names are resolved through an optional tenant prefix:
/// with prefix `acme`, logical index `products` maps to `acme_products`.
pub struct MeiliClient {
    client: Client,
    prefix: Option<String>,
    transformers: TransformerRegistry,
}

impl MeiliClient {
    /// Create a new Meilisearch client
    pub fn new(
        url: &str,
        api_key: &str,
        prefix: Option<String>,
        transformers: TransformerRegistry,
    ) -> Result<Self> {
        let client =
            Client::new(url, Some(api_key)).context("Failed to create Meilisearch client")?;

        Ok(Self {
            client,
            prefix,
            transformers,
        })
    }

    /// Resolve a logical index name through the tenant prefix
    fn prefixed(&self, index_name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, index_name),
            None => index_name.to_string(),
        }
    }

    /// Create all configured indexes and apply their settings.
    ///
    /// Safe to run on every startup: creating an existing index is a no-op at
    /// the task level.
    pub async fn ensure_indexes(&self, indexes: &HashMap<String, IndexYamlConfig>) -> Result<()> {
        for (index_name, index_config) in indexes {
            self.create_index(index_name, index_config.primary_key.as_deref())
                .await?;

            if let Some(attributes) = &index_config.index_settings {
                self.update_settings(index_name, attributes).await?;
            }
        }
        Ok(())
    }

    /// Create an index and wait for the task to settle
    pub async fn create_index(&self, index_name: &str, primary_key: Option<&str>) -> Result<()> {
        let uid = self.prefixed(index_name);
        let task = self
            .client
            .create_index(&uid, primary_key.or(Some("id")))
            .await
            .with_context(|| format!("Failed to create index {}", uid))?;

        task.wait_for_completion(&self.client, None, None).await?;
        Ok(())
    }

    /// Existence probe — `Ok(None)` when the index does not exist
    pub async fn get_index(&self, index_name: &str) -> Result<Option<IndexInfo>> {
        let uid = self.prefixed(index_name);
        match self.client.get_index(&uid).await {
            Ok(index) => Ok(Some(IndexInfo { uid: index.uid })),
            Err(MeiliError::Meilisearch(MeilisearchError {
                error_code: ErrorCode::IndexNotFound,
                ..
            })) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to look up index {}", uid)),
        }
    }

    /// Add entities as documents, transformed per entity type.
    ///
    /// Documents are keyed on `id`, so re-adding an entity replaces the
    /// previous document. Waits for the indexing task so subsequent searches
    /// observe the write.
    pub async fn add_documents(
        &self,
        index_name: &str,
        records: &[EntityRecord],
        entity_type: &str,
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let documents = self.transformers.apply(entity_type, records)?;
        let uid = self.prefixed(index_name);
        let task = self
            .client
            .index(&uid)
            .add_documents(&documents, Some("id"))
            .await
            .with_context(|| format!("Failed to add documents to index {}", uid))?;

        task.wait_for_completion(&self.client, None, None).await?;
        Ok(())
    }

    /// Run a query and return the raw hit list
    pub async fn search(&self, index_name: &str, query: &str) -> Result<Vec<serde_json::Value>> {
        let index = self.client.index(self.prefixed(index_name));

        let results: SearchResults<serde_json::Value> =
            index.search().with_query(query).execute().await?;

        Ok(results.hits.into_iter().map(|h| h.result).collect())
    }

    /// Apply attribute settings and wait for the task to settle
    pub async fn update_settings(
        &self,
        index_name: &str,
        attributes: &IndexAttributes,
    ) -> Result<()> {
        let index = self.client.index(self.prefixed(index_name));

        let mut settings = Settings::new();
        if let Some(searchable) = &attributes.searchable_attributes {
            settings = settings.with_searchable_attributes(searchable);
        }
        if let Some(filterable) = &attributes.filterable_attributes {
            settings = settings.with_filterable_attributes(filterable);
        }
        if let Some(sortable) = &attributes.sortable_attributes {
            settings = settings.with_sortable_attributes(sortable);
        }

        let task = index.set_settings(&settings).await?;
        task.wait_for_completion(&self.client, None, None).await?;
        Ok(())
    }

    /// Delete a single document by id
    pub async fn delete_document(&self, index_name: &str, document_id: &str) -> Result<()> {
        let index = self.client.index(self.prefixed(index_name));
        let task = index.delete_document(document_id).await?;
        task.wait_for_completion(&self.client, None, None).await?;
        Ok(())
    }

    /// Delete every document in the index
    pub async fn delete_all_documents(&self, index_name: &str) -> Result<()> {
        let index = self.client.index(self.prefixed(index_name));
        let task = index.delete_all_documents().await?;
        task.wait_for_completion(&self.client, None, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(prefix: Option<&str>) -> MeiliClient {
        MeiliClient::new(
            "http://localhost:7700",
            "test-key",
            prefix.map(String::from),
            TransformerRegistry::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_prefixed_with_prefix() {
        let client = client(Some("acme"));
        assert_eq!(client.prefixed("products"), "acme_products");
    }

    #[test]
    fn test_prefixed_without_prefix() {
        let client = client(None);
        assert_eq!(client.prefixed("products"), "products");
    }
}
