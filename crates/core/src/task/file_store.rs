//! File-based task storage implementation
//!
//! Stores tasks as JSON in a file on disk.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use super::model::{matches_category, sort_by_date, Task};
use super::repository::TaskRepository;
use crate::reminder::{BroadcastReminderBus, ReminderBus, ReminderEvent};
use crate::{Error, Result};

/// File-based task store using JSON
pub struct FileTaskStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of the persisted tasks, keyed by id
    cache: RwLock<BTreeMap<i64, Task>>,
    /// Where reminder requests are published
    reminders: Arc<dyn ReminderBus>,
}

impl FileTaskStore {
    /// Create a new FileTaskStore with its own reminder bus
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_reminder_bus(path, Arc::new(BroadcastReminderBus::default())).await
    }

    /// Create a new FileTaskStore publishing on the given reminder bus
    pub async fn with_reminder_bus(
        path: impl Into<PathBuf>,
        reminders: Arc<dyn ReminderBus>,
    ) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let tasks: Vec<Task> = serde_json::from_str(&content)?;
            let mut cache = BTreeMap::new();
            for task in tasks {
                if cache.contains_key(&task.id) {
                    return Err(Error::Storage(format!(
                        "{} contains task ID {} more than once",
                        path.display(),
                        task.id
                    )));
                }
                cache.insert(task.id, task);
            }
            debug!("Loaded {} tasks from {}", cache.len(), path.display());
            cache
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
            reminders,
        })
    }

    /// Write `tasks` to disk.
    ///
    /// Content goes to a sibling temp file first and is renamed into place,
    /// so the file always holds either the old or the new collection.
    async fn persist(&self, tasks: &BTreeMap<i64, Task>) -> Result<()> {
        let tasks: Vec<&Task> = tasks.values().collect();
        let content = serde_json::to_string_pretty(&tasks)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Apply `change` to a copy of the collection, persist it, then publish.
    ///
    /// The write lock is held throughout, so writers are serialized and
    /// readers see either the old or the new collection.
    async fn write<T>(
        &self,
        change: impl FnOnce(&mut BTreeMap<i64, Task>) -> Result<T>,
    ) -> Result<T> {
        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *cache = next;
        Ok(out)
    }
}

#[async_trait]
impl TaskRepository for FileTaskStore {
    async fn create(&self, task: Task) -> Result<Task> {
        let created = self
            .write(|tasks| {
                if tasks.contains_key(&task.id) {
                    return Err(Error::DuplicateId(task.id));
                }
                tasks.insert(task.id, task.clone());
                Ok(task)
            })
            .await?;

        info!("Created task {}", created.id);
        self.reminders.publish(ReminderEvent::schedule(&created));
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }

    async fn all_tasks_sorted_by_date(&self) -> Result<Vec<Task>> {
        let cache = self.cache.read().await;
        let mut tasks: Vec<Task> = cache.values().cloned().collect();
        sort_by_date(&mut tasks);
        Ok(tasks)
    }

    async fn tasks_matching_category(&self, category: &str) -> Result<Vec<Task>> {
        let cache = self.cache.read().await;
        let mut tasks: Vec<Task> = cache
            .values()
            .filter(|t| matches_category(t, category))
            .cloned()
            .collect();
        sort_by_date(&mut tasks);
        Ok(tasks)
    }

    async fn next_available_id(&self) -> Result<i64> {
        let cache = self.cache.read().await;
        match cache.keys().next_back() {
            None => Ok(0),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| Error::InvalidInput("task ID space exhausted".to_string())),
        }
    }

    async fn update(&self, task: Task) -> Result<Task> {
        let updated = self
            .write(|tasks| match tasks.get_mut(&task.id) {
                Some(existing) => {
                    *existing = task.clone();
                    Ok(task)
                }
                None => Err(Error::TaskNotFound(task.id)),
            })
            .await?;

        info!("Updated task {}", updated.id);
        self.reminders.publish(ReminderEvent::schedule(&updated));
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<Task> {
        let removed = self
            .write(|tasks| tasks.remove(&id).ok_or(Error::TaskNotFound(id)))
            .await?;

        info!("Deleted task {}", id);
        self.reminders.publish(ReminderEvent::cancel(id));
        Ok(removed)
    }

    fn subscribe(&self) -> broadcast::Receiver<ReminderEvent> {
        self.reminders.subscribe()
    }
}
