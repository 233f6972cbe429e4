//! Data provider abstraction and registry
//!
//! Entities live in services owned by the host platform. Each service is
//! exposed to the synchronizer as an [`EntityProvider`] registered under its
//! service name in a [`ProviderRegistry`] built at composition time.

mod registry;
mod traits;

pub use registry::ProviderRegistry;
pub use traits::{EntityProvider, EntityRecord, EntitySelector, ListOptions, SortOrder};

#[cfg(test)]
pub(crate) mod mock;
