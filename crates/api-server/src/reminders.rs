//! Reminder log consumer
//!
//! Stands in for a local notification service: it keeps a ledger of pending
//! reminders built from store events and logs every change.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use taskapp_core::reminder::ReminderEvent;

/// Pending reminders keyed by task id
#[derive(Clone, Default)]
pub struct PendingReminders {
    inner: Arc<RwLock<BTreeMap<i64, DateTime<Utc>>>>,
}

impl PendingReminders {
    pub async fn apply(&self, event: &ReminderEvent) {
        let mut pending = self.inner.write().await;
        match event {
            ReminderEvent::ScheduleRequested {
                task_id,
                title,
                fire_at,
                ..
            } => {
                info!("Scheduling reminder {} ({:?}) at {}", task_id, title, fire_at);
                pending.insert(*task_id, *fire_at);
            }
            ReminderEvent::CancelRequested { task_id } => {
                if pending.remove(task_id).is_some() {
                    info!("Cancelled reminder {}", task_id);
                } else {
                    debug!("No pending reminder {} to cancel", task_id);
                }
            }
        }
        debug!("{} reminders pending", pending.len());
    }

    pub async fn fire_time(&self, task_id: i64) -> Option<DateTime<Utc>> {
        self.inner.read().await.get(&task_id).copied()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Consume reminder events until the channel closes
pub fn spawn_reminder_logger(
    mut rx: broadcast::Receiver<ReminderEvent>,
    pending: PendingReminders,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => pending.apply(&event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Reminder logger lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use taskapp_core::task::Task;

    #[tokio::test]
    async fn schedule_then_cancel() {
        let pending = PendingReminders::default();
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let task = Task::new(3).with_date(date);

        pending.apply(&ReminderEvent::schedule(&task)).await;
        assert_eq!(pending.fire_time(3).await, Some(date));

        pending.apply(&ReminderEvent::cancel(3)).await;
        assert_eq!(pending.fire_time(3).await, None);
        assert_eq!(pending.len().await, 0);
    }

    #[tokio::test]
    async fn logger_drains_until_closed() {
        let (tx, rx) = broadcast::channel(8);
        let pending = PendingReminders::default();
        let handle = spawn_reminder_logger(rx, pending.clone());

        tx.send(ReminderEvent::schedule(&Task::new(1))).unwrap();
        tx.send(ReminderEvent::schedule(&Task::new(2))).unwrap();
        tx.send(ReminderEvent::cancel(1)).unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(pending.len().await, 1);
        assert!(pending.fire_time(2).await.is_some());
    }
}
