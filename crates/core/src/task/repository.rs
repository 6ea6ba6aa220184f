//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::model::Task;
use crate::reminder::ReminderEvent;
use crate::Result;

/// Repository interface for task CRUD operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task. Fails with `DuplicateId` if the id is taken.
    async fn create(&self, task: Task) -> Result<Task>;

    /// Get a task by ID
    async fn get(&self, id: i64) -> Result<Option<Task>>;

    /// Get all tasks, ascending by date
    async fn all_tasks_sorted_by_date(&self) -> Result<Vec<Task>>;

    /// Find tasks whose category equals `category` exactly.
    ///
    /// An empty `category` is no filter at all and returns every task.
    async fn tasks_matching_category(&self, category: &str) -> Result<Vec<Task>>;

    /// Highest existing id plus one, or 0 for an empty store
    async fn next_available_id(&self) -> Result<i64>;

    /// Update an existing task
    async fn update(&self, task: Task) -> Result<Task>;

    /// Delete a task by ID, requesting cancellation of its reminder
    async fn delete(&self, id: i64) -> Result<Task>;

    /// Subscribe to reminder events emitted by writes
    fn subscribe(&self) -> broadcast::Receiver<ReminderEvent>;
}
