//! Sync event system
//!
//! This module provides:
//! - `SyncEvent` — the index-registration payload delivered by the host
//! - `EventBus` — broadcast channel distributing events to sync workers
//! - `spawn_sync_worker` — composition-time wiring of a synchronizer to the bus

mod bus;
mod types;

pub use bus::{spawn_sync_worker, EventBus};
pub use types::{EventEmitter, SyncEvent, REGISTER_MEILISEARCH_INDEX_EVENT};
