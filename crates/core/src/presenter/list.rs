//! Task list presenter

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

use super::row::TaskRow;
use crate::task::{Task, TaskRepository};
use crate::{Error, Result};

/// How long an unsaved draft keeps its id reserved
pub const DEFAULT_DRAFT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Default)]
struct ListState {
    /// Active category search, `None` when showing everything
    query: Option<String>,
    /// Result set currently on screen
    tasks: Vec<Task>,
}

struct Draft {
    task: Task,
    reserved_at: Instant,
}

/// Presenter for the single task list screen
#[derive(Clone)]
pub struct TaskListPresenter {
    store: Arc<dyn TaskRepository>,
    state: Arc<RwLock<ListState>>,
    /// Drafts handed out but not saved yet, keyed by their reserved id
    drafts: Arc<Mutex<BTreeMap<i64, Draft>>>,
    draft_ttl: Duration,
}

impl TaskListPresenter {
    pub fn new(store: Arc<dyn TaskRepository>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(ListState::default())),
            drafts: Arc::new(Mutex::new(BTreeMap::new())),
            draft_ttl: DEFAULT_DRAFT_TTL,
        }
    }

    /// Set how long an abandoned draft holds on to its id
    pub fn with_draft_ttl(mut self, ttl: Duration) -> Self {
        self.draft_ttl = ttl;
        self
    }

    pub fn store(&self) -> &Arc<dyn TaskRepository> {
        &self.store
    }

    /// Show the full list sorted by date, dropping any active search
    pub async fn on_list_displayed(&self) -> Result<Vec<Task>> {
        self.show(None).await
    }

    /// Filter the list by exact category. Empty text behaves like a cleared search.
    pub async fn on_search_submitted(&self, category: &str) -> Result<Vec<Task>> {
        let query = (!category.is_empty()).then(|| category.to_string());
        self.show(query).await
    }

    pub async fn on_search_cleared(&self) -> Result<Vec<Task>> {
        self.show(None).await
    }

    /// Start a new task with a fresh id, dated now
    ///
    /// The id stays reserved until the draft is saved, discarded, or older
    /// than the draft TTL.
    pub async fn on_create_requested(&self) -> Result<Task> {
        let mut drafts = self.drafts.lock().await;
        let ttl = self.draft_ttl;
        drafts.retain(|id, draft| {
            let keep = draft.reserved_at.elapsed() < ttl;
            if !keep {
                debug!("Released expired draft task {}", id);
            }
            keep
        });

        let mut id = self.store.next_available_id().await?;
        if let Some(last) = drafts.keys().next_back() {
            if *last >= id {
                id = last
                    .checked_add(1)
                    .ok_or_else(|| Error::InvalidInput("task ID space exhausted".to_string()))?;
            }
        }

        let task = Task::new(id);
        drafts.insert(
            id,
            Draft {
                task: task.clone(),
                reserved_at: Instant::now(),
            },
        );
        debug!("Reserved draft task {}", id);
        Ok(task)
    }

    /// Unsaved draft with this id, as it was handed out
    pub async fn draft(&self, id: i64) -> Option<Task> {
        self.drafts.lock().await.get(&id).map(|d| d.task.clone())
    }

    /// Abandon a draft without saving it
    pub async fn on_draft_discarded(&self, id: i64) -> bool {
        self.drafts.lock().await.remove(&id).is_some()
    }

    /// Load an existing task for editing
    pub async fn on_row_selected(&self, id: i64) -> Result<Task> {
        self.store.get(id).await?.ok_or(Error::TaskNotFound(id))
    }

    /// Save an edited task: drafts are created, everything else updated
    pub async fn on_edit_confirmed(&self, task: Task) -> Result<Task> {
        let id = task.id;
        let mut drafts = self.drafts.lock().await;
        let saved = if drafts.contains_key(&id) {
            // Reservation lock stays held until the task is in the store.
            let saved = self.store.create(task).await?;
            drafts.remove(&id);
            drop(drafts);
            saved
        } else {
            drop(drafts);
            self.store.update(task).await?
        };
        self.refresh().await?;
        Ok(saved)
    }

    /// Delete a task; the store requests cancellation of its reminder
    pub async fn on_delete_confirmed(&self, id: i64) -> Result<Task> {
        let removed = self.store.delete(id).await?;
        self.refresh().await?;
        Ok(removed)
    }

    /// Current result set
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    /// Current result set rendered for display
    pub async fn rows(&self) -> Vec<TaskRow> {
        self.state.read().await.tasks.iter().map(TaskRow::from).collect()
    }

    /// Active category search, if any
    pub async fn query(&self) -> Option<String> {
        self.state.read().await.query.clone()
    }

    /// Re-run the active query against the store
    pub async fn refresh(&self) -> Result<Vec<Task>> {
        let query = self.state.read().await.query.clone();
        self.show(query).await
    }

    async fn show(&self, query: Option<String>) -> Result<Vec<Task>> {
        let tasks = match &query {
            Some(category) => self.store.tasks_matching_category(category).await?,
            None => self.store.all_tasks_sorted_by_date().await?,
        };

        let mut state = self.state.write().await;
        state.query = query;
        state.tasks = tasks.clone();
        Ok(tasks)
    }
}
