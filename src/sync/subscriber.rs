//! Event-driven entity synchronizer

use super::error::SyncError;
use super::settings::{SubscriberSetting, SubscriberSettings};
use crate::events::SyncEvent;
use crate::meilisearch::SearchStore;
use crate::provider::{
    EntityProvider, EntityRecord, EntitySelector, ListOptions, ProviderRegistry, SortOrder,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Synchronizes Meilisearch indexes with entity data from registered providers.
///
/// Each [`handle_sync_event`](Self::handle_sync_event) invocation runs as one
/// sequential chain of provider and gateway calls; pages are fetched and
/// written strictly in increasing-id order. There is no mutual exclusion
/// across concurrent invocations: two simultaneous full reindexes of the same
/// index can interleave and do redundant work. The synchronizer holds no
/// state across invocations.
pub struct EntitySynchronizer {
    search: Arc<dyn SearchStore>,
    providers: Arc<ProviderRegistry>,
    settings: SubscriberSettings,
}

impl EntitySynchronizer {
    pub fn new(
        search: Arc<dyn SearchStore>,
        providers: Arc<ProviderRegistry>,
        settings: SubscriberSettings,
    ) -> Self {
        Self {
            search,
            providers,
            settings,
        }
    }

    /// Handle an index registration event.
    ///
    /// With an `entity_id`, indexes just that entity (skipping if already
    /// present). Without one, runs a full reindex unless the freshness probe
    /// reports the index already holds the newest source record.
    ///
    /// Errors are logged with the index name and returned — never retried
    /// here; the host decides whether to redeliver.
    pub async fn handle_sync_event(&self, event: &SyncEvent) -> Result<(), SyncError> {
        debug!(
            index = %event.index_name,
            entity_id = ?event.entity_id,
            "sync event received"
        );

        match self.sync(event).await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!(index = %event.index_name, error = %err, "index synchronization failed");
                Err(err)
            }
        }
    }

    async fn sync(&self, event: &SyncEvent) -> Result<(), SyncError> {
        let setting = self.subscriber_setting(&event.index_name).await?;

        match &event.entity_id {
            Some(entity_id) => {
                self.sync_entity(&event.index_name, setting, entity_id)
                    .await
            }
            None => {
                if !self.can_add_entities(&event.index_name, setting).await? {
                    return Ok(());
                }
                let count = self.sync_all(&event.index_name, setting).await?;
                debug!(index = %event.index_name, count, "full reindex complete");
                Ok(())
            }
        }
    }

    /// Resolve the subscriber setting and verify the target index exists
    async fn subscriber_setting(&self, index_name: &str) -> Result<&SubscriberSetting, SyncError> {
        let setting = self
            .settings
            .get(index_name)
            .ok_or_else(|| SyncError::SubscriberSettingNotFound(index_name.to_string()))?;

        if self.search.get_index(index_name).await?.is_none() {
            return Err(SyncError::IndexNotFound(index_name.to_string()));
        }

        Ok(setting)
    }

    fn provider(&self, service_name: &str) -> Result<Arc<dyn EntityProvider>, SyncError> {
        self.providers
            .get(service_name)
            .ok_or_else(|| SyncError::ServiceNotFound(service_name.to_string()))
    }

    /// Index a single entity by id, skipping entities already present
    async fn sync_entity(
        &self,
        index_name: &str,
        setting: &SubscriberSetting,
        entity_id: &str,
    ) -> Result<(), SyncError> {
        let provider = self.provider(&setting.service_name)?;

        let entities = provider
            .list(
                &EntitySelector::ById(entity_id.to_string()),
                &ListOptions::ascending(1),
            )
            .await?;
        let entity = entities
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::EntityNotFound {
                service_name: setting.service_name.clone(),
                entity_id: entity_id.to_string(),
            })?;

        let hits = self.search.search(index_name, entity_id).await?;
        if !hits.is_empty() {
            debug!(index = %index_name, entity_id, "entity already indexed, skipping");
            return Ok(());
        }

        self.search
            .add_documents(index_name, std::slice::from_ref(&entity), &setting.index_type)
            .await?;
        debug!(index = %index_name, entity_id, "entity added to index");
        Ok(())
    }

    /// Cursor-paged full reindex. Returns the number of entities indexed.
    async fn sync_all(
        &self,
        index_name: &str,
        setting: &SubscriberSetting,
    ) -> Result<usize, SyncError> {
        let provider = self.provider(&setting.service_name)?;
        let mut last_seen_id = String::new();
        let mut count = 0;

        loop {
            let page = provider
                .list(
                    &EntitySelector::IdGreaterThan(last_seen_id.clone()),
                    &ListOptions {
                        relations: setting.relations.clone(),
                        take: setting.take,
                        order: SortOrder::IdAsc,
                    },
                )
                .await?;

            // An empty page is the only termination signal: a full page of
            // exactly `take` items always triggers one more fetch.
            let Some(last) = page.last() else {
                break;
            };
            last_seen_id = last.id.clone();
            count += page.len();

            self.search
                .add_documents(index_name, &page, &setting.index_type)
                .await?;
        }

        Ok(count)
    }

    /// Freshness probe: compares the single newest source record against the
    /// index. Detects only insertions of new latest ids — an update to an
    /// existing record does not make the index stale by this check.
    async fn can_add_entities(
        &self,
        index_name: &str,
        setting: &SubscriberSetting,
    ) -> Result<bool, SyncError> {
        let Some(last_entity) = self.last_entity(setting).await? else {
            debug!(index = %index_name, "source has no entities, skipping reindex");
            return Ok(false);
        };

        let hits = self.search.search(index_name, &last_entity.id).await?;
        if !hits.is_empty() {
            debug!(index = %index_name, "index already holds the newest record, skipping reindex");
            return Ok(false);
        }

        Ok(true)
    }

    /// The most recent entity by id, if any
    async fn last_entity(
        &self,
        setting: &SubscriberSetting,
    ) -> Result<Option<EntityRecord>, SyncError> {
        let provider = self.provider(&setting.service_name)?;
        let entities = provider
            .list(
                &EntitySelector::IdGreaterThan(String::new()),
                &ListOptions {
                    relations: setting.relations.clone(),
                    take: 1,
                    order: SortOrder::IdDesc,
                },
            )
            .await?;
        Ok(entities.into_iter().next())
    }
}
