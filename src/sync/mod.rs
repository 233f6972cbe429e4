//! Entity synchronization
//!
//! Reacts to index registration events: resolves the configured subscriber
//! setting, verifies the target index exists, and either indexes a single
//! entity (idempotently) or runs a freshness-probed, cursor-paged full
//! reindex from the backing data provider.

mod error;
mod settings;
mod subscriber;

pub use error::SyncError;
pub use settings::{SubscriberSetting, SubscriberSettings, DEFAULT_TAKE};
pub use subscriber::EntitySynchronizer;
