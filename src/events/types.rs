//! Sync event types

use serde::{Deserialize, Serialize};

/// Topic under which index registration events are published
pub const REGISTER_MEILISEARCH_INDEX_EVENT: &str = "REGISTER_MEILISEARCH_INDEX_EVENT";

/// An index synchronization request.
///
/// With `entity_id` set, only that entity is (re)indexed; without it, the
/// whole backing collection is considered for a full reindex.
/// Must be Clone for `tokio::sync::broadcast`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Logical name of the index to synchronize
    pub index_name: String,
    /// Single entity to index; absent means full reindex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// ISO 8601 timestamp
    pub timestamp: String,
}

impl SyncEvent {
    /// Create a full-reindex event with the current timestamp
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            entity_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Narrow the event to a single entity
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }
}

/// Sink for sync events — implemented by the bus and by host-side bridges
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: SyncEvent);
}
