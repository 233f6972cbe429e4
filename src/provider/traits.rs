//! Trait abstraction for entity listing

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An entity as served by a data provider.
///
/// `id` is mandatory; everything else is carried opaquely and flattened into
/// the indexed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl EntityRecord {
    /// Create a record with just an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: serde_json::Map::new(),
        }
    }

    /// Set an additional field
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// Filter applied to an entity listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitySelector {
    /// Exact id match
    ById(String),
    /// Exclusive lower bound on id — `""` means "before all records"
    IdGreaterThan(String),
}

/// Ordering over entity ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    IdAsc,
    IdDesc,
}

/// Options for an entity listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Related data to include with each entity
    pub relations: Vec<String>,
    /// Maximum number of entities to return
    pub take: usize,
    pub order: SortOrder,
}

impl ListOptions {
    /// Ascending listing with the given page size and no relations
    pub fn ascending(take: usize) -> Self {
        Self {
            relations: Vec::new(),
            take,
            order: SortOrder::IdAsc,
        }
    }

    /// Attach relations
    pub fn with_relations(mut self, relations: Vec<String>) -> Self {
        self.relations = relations;
        self
    }
}

/// A named service exposing ordered, filterable listing of entities.
///
/// Contract: results are ordered by `options.order`, capped at
/// `options.take`, and [`EntitySelector::IdGreaterThan`] is an exclusive
/// lower bound in the provider's native id collation. Cursor-based sync
/// assumes that collation agrees with lexicographic ordering of id strings;
/// if it does not, pagination silently skips or repeats records.
#[async_trait]
pub trait EntityProvider: Send + Sync {
    /// List entities matching the selector
    async fn list(
        &self,
        selector: &EntitySelector,
        options: &ListOptions,
    ) -> Result<Vec<EntityRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_record_flatten_roundtrip() {
        let record = EntityRecord::new("prod_1")
            .with_field("title", json!("Desk lamp"))
            .with_field("price", json!(4900));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "prod_1");
        assert_eq!(value["title"], "Desk lamp");
        assert_eq!(value["price"], 4900);

        let back: EntityRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_entity_record_requires_id() {
        let result: Result<EntityRecord, _> =
            serde_json::from_value(json!({"title": "No id here"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_options_builder() {
        let options = ListOptions::ascending(100).with_relations(vec!["variants".into()]);
        assert_eq!(options.take, 100);
        assert_eq!(options.order, SortOrder::IdAsc);
        assert_eq!(options.relations, vec!["variants"]);
    }
}
