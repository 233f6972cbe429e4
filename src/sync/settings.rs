//! Subscriber setting registry

use crate::IndexYamlConfig;
use std::collections::HashMap;

/// Default page size for batch sync
pub const DEFAULT_TAKE: usize = 100;

/// Synchronization configuration for one index.
///
/// Built once from plugin configuration; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberSetting {
    /// Name of the data provider to pull entities from
    pub service_name: String,
    /// Related data to include when listing entities
    pub relations: Vec<String>,
    /// Entity-type tag for document transformation
    pub index_type: String,
    /// Page size for batch sync
    pub take: usize,
}

/// Read-only lookup from index name to subscriber setting
#[derive(Debug, Clone, Default)]
pub struct SubscriberSettings {
    settings: HashMap<String, SubscriberSetting>,
}

impl SubscriberSettings {
    /// Build the registry from per-index configuration.
    ///
    /// Indexes without a `subscriber` section get no entry — events for them
    /// fail with `SubscriberSettingNotFound`.
    pub fn from_config(indexes: &HashMap<String, IndexYamlConfig>) -> Self {
        let settings = indexes
            .iter()
            .filter_map(|(index_name, index_config)| {
                let subscriber = index_config.subscriber.as_ref()?;
                Some((
                    index_name.clone(),
                    SubscriberSetting {
                        service_name: subscriber.service_name.clone(),
                        relations: subscriber.relations.clone(),
                        index_type: subscriber
                            .index_type
                            .clone()
                            .unwrap_or_else(|| index_name.clone()),
                        take: subscriber.take.unwrap_or(DEFAULT_TAKE),
                    },
                ))
            })
            .collect();

        Self { settings }
    }

    /// Look up the setting for an index
    pub fn get(&self, index_name: &str) -> Option<&SubscriberSetting> {
        self.settings.get(index_name)
    }

    /// Number of configured subscribers
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}
