//! Application state

use std::sync::Arc;

use taskapp_core::presenter::TaskListPresenter;
use taskapp_core::reminder::{BroadcastReminderBus, ReminderBus};
use taskapp_core::task::{FileTaskStore, TaskRepository};

use crate::config::ServerConfig;
use crate::reminders::PendingReminders;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    presenter: TaskListPresenter,
    reminders: PendingReminders,
}

impl AppState {
    /// Create a new AppState backed by the configured tasks file
    pub async fn new(config: &ServerConfig) -> taskapp_core::Result<Self> {
        let reminders: Arc<dyn ReminderBus> =
            Arc::new(BroadcastReminderBus::new(config.reminder_capacity));
        let task_store = FileTaskStore::with_reminder_bus(config.tasks_path(), reminders).await?;
        Ok(Self::with_store(Arc::new(task_store)))
    }

    pub fn with_store(store: Arc<dyn TaskRepository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                presenter: TaskListPresenter::new(store),
                reminders: PendingReminders::default(),
            }),
        }
    }

    pub fn presenter(&self) -> &TaskListPresenter {
        &self.inner.presenter
    }

    /// Reminders the log consumer currently considers pending
    pub fn reminders(&self) -> &PendingReminders {
        &self.inner.reminders
    }

    /// Get reference to the task store
    pub fn task_store(&self) -> &Arc<dyn TaskRepository> {
        self.inner.presenter.store()
    }
}
