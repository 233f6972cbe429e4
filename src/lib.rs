//! Meilisearch entity index synchronization
//!
//! A plugin library that keeps Meilisearch indexes synchronized with entity
//! data owned by a host platform:
//! - Search index gateway with tenant prefixing and per-type document transforms
//! - Named data-provider registry with cursor-style listing
//! - Event-driven entity synchronizer with an idempotent single-entity path
//!   and a freshness-probed full reindex path

pub mod events;
pub mod meilisearch;
pub mod provider;
pub mod sync;

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub meilisearch: MeilisearchYamlConfig,
    /// Optional tenant prefix — logical index `products` becomes `{prefix}_products`
    pub prefix: Option<String>,
    /// Per-index configuration, keyed by logical index name
    pub indexes: HashMap<String, IndexYamlConfig>,
}

/// Meilisearch configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeilisearchYamlConfig {
    pub url: String,
    pub key: String,
}

impl Default for MeilisearchYamlConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7700".into(),
            key: "meili-sync-key-change-me".into(),
        }
    }
}

/// Configuration for a single index
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct IndexYamlConfig {
    /// Primary key for the index (default: "id")
    pub primary_key: Option<String>,
    /// Raw index settings applied at startup
    pub index_settings: Option<IndexAttributes>,
    /// Synchronization configuration — if absent, the index is never synced
    /// by the subscriber, only created
    pub subscriber: Option<SubscriberYamlConfig>,
}

/// Searchable/filterable/sortable attribute settings for an index
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct IndexAttributes {
    pub searchable_attributes: Option<Vec<String>>,
    pub filterable_attributes: Option<Vec<String>>,
    pub sortable_attributes: Option<Vec<String>>,
}

/// Subscriber section of an index configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriberYamlConfig {
    /// Name of the data provider to pull entities from.
    /// Must be registered in the [`provider::ProviderRegistry`] at sync time.
    pub service_name: String,
    /// Related data to include when listing entities
    #[serde(default)]
    pub relations: Vec<String>,
    /// Entity-type tag for document transformation (default: the index name)
    pub index_type: Option<String>,
    /// Page size for batch sync (default: 100)
    pub take: Option<usize>,
}

// ============================================================================
// Runtime config (what the plugin actually uses)
// ============================================================================

/// Plugin configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub meilisearch_url: String,
    pub meilisearch_key: String,
    pub prefix: Option<String>,
    pub indexes: HashMap<String, IndexYamlConfig>,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            meilisearch_url: std::env::var("MEILISEARCH_URL").unwrap_or(yaml.meilisearch.url),
            meilisearch_key: std::env::var("MEILISEARCH_KEY").unwrap_or(yaml.meilisearch.key),
            prefix: std::env::var("MEILISEARCH_PREFIX").ok().or(yaml.prefix),
            indexes: yaml.indexes,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Plugin state
// ============================================================================

/// Shared plugin state — the composition root.
///
/// Builds the gateway from config, pairs it with the caller-supplied
/// provider registry, and wires the synchronizer. The event-bus subscription
/// is explicit: call [`PluginState::start_sync_worker`] to begin consuming
/// sync events.
#[derive(Clone)]
pub struct PluginState {
    pub search: Arc<dyn meilisearch::SearchStore>,
    pub providers: Arc<provider::ProviderRegistry>,
    pub bus: events::EventBus,
    pub synchronizer: Arc<sync::EntitySynchronizer>,
    pub config: Arc<Config>,
}

impl PluginState {
    /// Create new plugin state with identity document transforms
    pub async fn new(config: Config, providers: provider::ProviderRegistry) -> Result<Self> {
        Self::with_transformers(config, providers, meilisearch::TransformerRegistry::new()).await
    }

    /// Create new plugin state with custom per-entity-type document transforms
    pub async fn with_transformers(
        config: Config,
        providers: provider::ProviderRegistry,
        transformers: meilisearch::TransformerRegistry,
    ) -> Result<Self> {
        let client = meilisearch::client::MeiliClient::new(
            &config.meilisearch_url,
            &config.meilisearch_key,
            config.prefix.clone(),
            transformers,
        )?;
        client.ensure_indexes(&config.indexes).await?;

        let search: Arc<dyn meilisearch::SearchStore> = Arc::new(client);
        let providers = Arc::new(providers);
        let settings = sync::SubscriberSettings::from_config(&config.indexes);
        let synchronizer = Arc::new(sync::EntitySynchronizer::new(
            search.clone(),
            providers.clone(),
            settings,
        ));

        Ok(Self {
            search,
            providers,
            bus: events::EventBus::default(),
            synchronizer,
            config: Arc::new(config),
        })
    }

    /// Subscribe the synchronizer to the event bus.
    ///
    /// The worker runs until the bus is dropped. Sync failures are logged and
    /// dropped — redelivery policy belongs to the host.
    pub fn start_sync_worker(&self) -> tokio::task::JoinHandle<()> {
        events::spawn_sync_worker(&self.bus, self.synchronizer.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_config_loading() {
        let yaml = r#"
meilisearch:
  url: http://search:7700
  key: test-key

prefix: acme

indexes:
  products:
    primary_key: id
    index_settings:
      searchable_attributes: [title, description]
      filterable_attributes: [category]
    subscriber:
      service_name: product_service
      relations: [variants]
      take: 50
  brands:
    subscriber:
      service_name: brand_service
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.meilisearch.url, "http://search:7700");
        assert_eq!(config.meilisearch.key, "test-key");
        assert_eq!(config.prefix.as_deref(), Some("acme"));

        let products = &config.indexes["products"];
        assert_eq!(products.primary_key.as_deref(), Some("id"));
        let settings = products.index_settings.as_ref().unwrap();
        assert_eq!(
            settings.searchable_attributes.as_deref(),
            Some(&["title".to_string(), "description".to_string()][..])
        );
        let subscriber = products.subscriber.as_ref().unwrap();
        assert_eq!(subscriber.service_name, "product_service");
        assert_eq!(subscriber.relations, vec!["variants"]);
        assert_eq!(subscriber.take, Some(50));
        assert!(subscriber.index_type.is_none());

        let brands = &config.indexes["brands"];
        assert!(brands.primary_key.is_none());
        let subscriber = brands.subscriber.as_ref().unwrap();
        assert!(subscriber.relations.is_empty());
        assert!(subscriber.take.is_none());
    }

    #[test]
    fn test_yaml_defaults() {
        let config = YamlConfig::default();
        assert_eq!(config.meilisearch.url, "http://localhost:7700");
        assert!(config.prefix.is_none());
        assert!(config.indexes.is_empty());
    }

    #[test]
    fn test_index_without_subscriber() {
        let yaml = r#"
indexes:
  static_pages:
    primary_key: slug
"#;
        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        let pages = &config.indexes["static_pages"];
        assert_eq!(pages.primary_key.as_deref(), Some("slug"));
        assert!(pages.subscriber.is_none());
    }

    /// Combined test for YAML file loading and env var overrides.
    /// Runs as a single test to avoid parallel env var race conditions.
    #[test]
    fn test_yaml_and_env_lifecycle() {
        fn clear_env() {
            for var in &["MEILISEARCH_URL", "MEILISEARCH_KEY", "MEILISEARCH_PREFIX"] {
                std::env::remove_var(var);
            }
        }

        clear_env();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "meilisearch:\n  url: http://yaml:7700\n  key: yaml-key\nprefix: yaml_prefix"
        )
        .unwrap();

        // YAML values win over defaults
        let config = Config::from_yaml_and_env(Some(file.path())).unwrap();
        assert_eq!(config.meilisearch_url, "http://yaml:7700");
        assert_eq!(config.meilisearch_key, "yaml-key");
        assert_eq!(config.prefix.as_deref(), Some("yaml_prefix"));

        // Env vars win over YAML
        std::env::set_var("MEILISEARCH_URL", "http://env:7700");
        std::env::set_var("MEILISEARCH_PREFIX", "env_prefix");
        let config = Config::from_yaml_and_env(Some(file.path())).unwrap();
        assert_eq!(config.meilisearch_url, "http://env:7700");
        assert_eq!(config.meilisearch_key, "yaml-key");
        assert_eq!(config.prefix.as_deref(), Some("env_prefix"));

        // Missing file falls back to defaults (plus env overrides)
        clear_env();
        let config =
            Config::from_yaml_and_env(Some(Path::new("/nonexistent/config.yaml"))).unwrap();
        assert_eq!(config.meilisearch_url, "http://localhost:7700");
        assert!(config.indexes.is_empty());

        clear_env();
    }
}
