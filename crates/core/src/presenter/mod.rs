//! List presentation
//!
//! Relays user intent from a list screen to a [`TaskRepository`] and keeps
//! the screen's current result set fresh after every mutation.
//!
//! [`TaskRepository`]: crate::task::TaskRepository

mod list;
mod row;

pub use list::{TaskListPresenter, DEFAULT_DRAFT_TTL};
pub use row::{TaskRow, ROW_DATE_FORMAT};
