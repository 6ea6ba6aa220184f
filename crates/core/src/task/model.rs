//! Task model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub contents: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
}

impl Task {
    /// Create an empty task dated now
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: String::new(),
            contents: String::new(),
            date: Utc::now(),
            category: String::new(),
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the contents
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = contents.into();
        self
    }

    /// Set the date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Identifier used for the task's pending reminder
    pub fn reminder_id(&self) -> String {
        self.id.to_string()
    }
}

/// Category search predicate.
///
/// Empty text means "no filter" rather than "tasks without a category".
pub fn matches_category(task: &Task, category: &str) -> bool {
    category.is_empty() || task.category == category
}

/// Sort tasks ascending by date, ties broken by id
pub fn sort_by_date(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
}
