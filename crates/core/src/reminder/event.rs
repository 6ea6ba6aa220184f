//! Reminder event definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Request for the notification collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReminderEvent {
    /// A task was saved; (re)schedule its alert at `fire_at`
    ScheduleRequested {
        task_id: i64,
        title: String,
        contents: String,
        fire_at: DateTime<Utc>,
    },
    /// A task was deleted; drop any pending alert for it
    CancelRequested { task_id: i64 },
}

impl ReminderEvent {
    pub fn schedule(task: &Task) -> Self {
        Self::ScheduleRequested {
            task_id: task.id,
            title: task.title.clone(),
            contents: task.contents.clone(),
            fire_at: task.date,
        }
    }

    pub fn cancel(task_id: i64) -> Self {
        Self::CancelRequested { task_id }
    }

    pub fn task_id(&self) -> i64 {
        match self {
            Self::ScheduleRequested { task_id, .. } | Self::CancelRequested { task_id } => *task_id,
        }
    }

    /// Identifier of the pending notification this event refers to
    pub fn reminder_id(&self) -> String {
        self.task_id().to_string()
    }
}
