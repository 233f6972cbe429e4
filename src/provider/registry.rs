//! Explicit name → provider map, built at composition time

use super::traits::EntityProvider;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of data providers keyed by service name.
///
/// Populated once by the host before the synchronizer starts; lookups are
/// read-only afterwards.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn EntityProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under a service name, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn EntityProvider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Look up a provider by service name
    pub fn get(&self, name: &str) -> Option<Arc<dyn EntityProvider>> {
        self.providers.get(name).cloned()
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
