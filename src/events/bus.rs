//! Event bus distributing sync events to workers

use super::types::{EventEmitter, SyncEvent};
use crate::sync::EntitySynchronizer;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default broadcast channel capacity
const DEFAULT_CAPACITY: usize = 1024;

/// Event bus that distributes SyncEvents via `tokio::sync::broadcast`
///
/// Fire-and-forget: emitting never blocks, never panics.
/// If no subscribers are connected, events are silently dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventEmitter for EventBus {
    fn emit(&self, event: SyncEvent) {
        let index = event.index_name.clone();
        let entity = event.entity_id.clone();
        match self.sender.send(event) {
            Ok(n) => {
                debug!(
                    index = %index,
                    entity_id = ?entity,
                    subscribers = n,
                    "SyncEvent emitted"
                );
            }
            Err(_) => {
                // No subscribers — this is expected and fine
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Drive a synchronizer from the bus.
///
/// Runs until every sender is dropped. Sync failures are already logged by
/// the synchronizer and are not retried here — redelivery policy belongs to
/// the host.
pub fn spawn_sync_worker(
    bus: &EventBus,
    synchronizer: Arc<EntitySynchronizer>,
) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let _ = synchronizer.handle_sync_event(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "sync worker lagged behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
