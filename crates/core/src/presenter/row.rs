//! Display rows for the task list

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use crate::task::Task;

/// Date format shown under each row's title
pub const ROW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One rendered row of the task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
}

impl TaskRow {
    /// Render a row with the date in `tz`
    pub fn render_in<Tz: TimeZone>(task: &Task, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let local: DateTime<Tz> = task.date.with_timezone(tz);
        Self {
            id: task.id,
            title: task.title.clone(),
            subtitle: local.format(ROW_DATE_FORMAT).to_string(),
        }
    }
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self::render_in(task, &Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_render_formats_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 9, 5, 30).unwrap();
        let task = Task::new(4).with_title("Laundry").with_date(date);

        let row = TaskRow::render_in(&task, &Utc);
        assert_eq!(row.id, 4);
        assert_eq!(row.title, "Laundry");
        assert_eq!(row.subtitle, "2024-01-02 09:05");
    }

    #[test]
    fn test_render_uses_timezone() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 20, 0, 0).unwrap();
        let task = Task::new(1).with_date(date);
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        assert_eq!(TaskRow::render_in(&task, &tokyo).subtitle, "2024-01-03 05:00");
    }
}
