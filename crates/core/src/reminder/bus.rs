//! ReminderBus - fan-out of reminder events to notification consumers.

use tokio::sync::broadcast;
use tracing::warn;

use super::ReminderEvent;

/// Publish/subscribe interface for reminder events
pub trait ReminderBus: Send + Sync {
    /// Publish an event to all active subscribers.
    fn publish(&self, event: ReminderEvent);

    /// Subscribe to reminder events.
    fn subscribe(&self) -> broadcast::Receiver<ReminderEvent>;
}

/// In-process ReminderBus based on tokio broadcast channels.
pub struct BroadcastReminderBus {
    tx: broadcast::Sender<ReminderEvent>,
    capacity: usize,
}

impl BroadcastReminderBus {
    /// Create a new broadcast bus with channel capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Return the configured channel capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BroadcastReminderBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ReminderBus for BroadcastReminderBus {
    fn publish(&self, event: ReminderEvent) {
        // No receiver is not an error; the write already happened.
        if let Err(broadcast::error::SendError(event)) = self.tx.send(event) {
            warn!(
                "No reminder subscriber for task {}, dropping {:?}",
                event.task_id(),
                event
            );
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ReminderEvent> {
        self.tx.subscribe()
    }
}
