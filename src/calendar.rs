//! Calendar projection: buckets a user's tasks into a day-keyed map of
//! due / reminder / in-progress lists for a date range.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::models::{Status, Task};
use crate::utils;

/// The three lists a calendar day can carry. A task may appear in more
/// than one list, and in more than one day's bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DayBucket {
    pub due: Vec<Task>,
    pub reminder: Vec<Task>,
    pub in_progress: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarSummary {
    /// Tasks retrieved for the range.
    pub total: i64,
    /// Tasks among them with status done.
    pub completed: i64,
    /// Entries across all due lists.
    pub due: i64,
    /// Entries across all reminder lists.
    pub reminder: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CalendarProjection {
    pub days: BTreeMap<String, DayBucket>,
    pub summary: CalendarSummary,
}

/// Fetch a user's tasks whose due date or reminder falls inside the
/// closed range [start, end]. Both bounds are required `YYYY-MM-DD`
/// dates.
pub fn tasks_in_range(
    db: &Database,
    user_id: i64,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<Task>> {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(Error::Validation(
                "start and end date are required".to_string(),
            ));
        }
    };
    let start = utils::parse_date(start)
        .map_err(|_| Error::InvalidDateFormat(start.to_string()))?;
    let end = utils::parse_date(end).map_err(|_| Error::InvalidDateFormat(end.to_string()))?;
    db.tasks_between(user_id, &start.to_string(), &end.to_string())
}

/// Build the day-bucket map over an already-retrieved task list.
///
/// Each task lands in the `due` list of its due day and the `reminder`
/// list of its reminder day, independently. In-progress tasks also land
/// in the `in_progress` list of their fallback day: due day, else
/// reminder day, else creation day. Bucket-internal order follows the
/// retrieval order.
pub fn project(tasks: &[Task]) -> CalendarProjection {
    let mut days: BTreeMap<String, DayBucket> = BTreeMap::new();
    let mut summary = CalendarSummary {
        total: tasks.len() as i64,
        ..CalendarSummary::default()
    };

    for task in tasks {
        let due_key = task.due_date.as_deref().map(utils::date_key);
        let reminder_key = task.reminder_time.as_deref().map(utils::date_key);
        let fallback_key = due_key
            .or(reminder_key)
            .unwrap_or_else(|| utils::date_key(&task.created_at));

        if task.status == Status::Done {
            summary.completed += 1;
        }

        if let Some(key) = due_key {
            days.entry(key.to_string()).or_default().due.push(task.clone());
        }
        if let Some(key) = reminder_key {
            days.entry(key.to_string())
                .or_default()
                .reminder
                .push(task.clone());
        }
        if task.status == Status::InProgress {
            days.entry(fallback_key.to_string())
                .or_default()
                .in_progress
                .push(task.clone());
        }
    }

    summary.due = days.values().map(|bucket| bucket.due.len() as i64).sum();
    summary.reminder = days
        .values()
        .map(|bucket| bucket.reminder.len() as i64)
        .sum();

    CalendarProjection { days, summary }
}

/// Fetch and project in one step.
pub fn project_range(
    db: &Database,
    user_id: i64,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<CalendarProjection> {
    let tasks = tasks_in_range(db, user_id, start, end)?;
    Ok(project(&tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str) -> Task {
        Task::new(1, title.to_string())
    }

    #[test]
    fn due_and_reminder_bucket_independently() {
        let mut t = task("split");
        t.id = Some(1);
        t.due_date = Some("2024-06-10T08:00:00+00:00".to_string());
        t.reminder_time = Some("2024-06-12T09:00:00+00:00".to_string());

        let projection = project(&[t]);

        let due_day = projection.days.get("2024-06-10").expect("due bucket");
        assert_eq!(due_day.due.len(), 1);
        assert!(due_day.reminder.is_empty());

        let reminder_day = projection.days.get("2024-06-12").expect("reminder bucket");
        assert_eq!(reminder_day.reminder.len(), 1);
        assert!(reminder_day.due.is_empty());

        // No other day carries the task.
        assert_eq!(projection.days.len(), 2);
        assert_eq!(projection.summary.due, 1);
        assert_eq!(projection.summary.reminder, 1);
    }

    #[test]
    fn in_progress_without_dates_falls_back_to_creation_day() {
        let mut t = task("ongoing");
        t.id = Some(1);
        t.status = Status::InProgress;

        let projection = project(&[t.clone()]);

        let created_day = utils::date_key(&t.created_at).to_string();
        let bucket = projection.days.get(&created_day).expect("fallback bucket");
        assert_eq!(bucket.in_progress.len(), 1);
        assert!(bucket.due.is_empty());
    }

    #[test]
    fn in_progress_with_due_date_falls_back_to_due_day() {
        let mut t = task("started");
        t.id = Some(1);
        t.status = Status::InProgress;
        t.due_date = Some("2024-06-10T08:00:00+00:00".to_string());
        t.reminder_time = Some("2024-06-12T09:00:00+00:00".to_string());

        let projection = project(&[t]);

        let due_day = projection.days.get("2024-06-10").unwrap();
        assert_eq!(due_day.in_progress.len(), 1);
        let reminder_day = projection.days.get("2024-06-12").unwrap();
        assert!(reminder_day.in_progress.is_empty());
    }

    #[test]
    fn summary_counts_done_tasks_and_entries() {
        let mut done = task("finished");
        done.id = Some(1);
        done.status = Status::Done;
        done.due_date = Some("2024-06-10T08:00:00+00:00".to_string());

        let mut pending = task("waiting");
        pending.id = Some(2);
        pending.due_date = Some("2024-06-10T09:00:00+00:00".to_string());

        let projection = project(&[done, pending]);
        assert_eq!(
            projection.summary,
            CalendarSummary {
                total: 2,
                completed: 1,
                due: 2,
                reminder: 0,
            }
        );
        // Bucket order follows retrieval order.
        let bucket = projection.days.get("2024-06-10").unwrap();
        assert_eq!(bucket.due[0].title, "finished");
        assert_eq!(bucket.due[1].title, "waiting");
    }

    #[test]
    fn missing_bounds_are_rejected() {
        let db = Database::open_in_memory().expect("in-memory database");
        let err = tasks_in_range(&db, 1, Some("2024-06-01"), None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = tasks_in_range(&db, 1, Some("June 1st"), Some("2024-06-30")).unwrap_err();
        assert!(matches!(err, Error::InvalidDateFormat(_)));
    }

    #[test]
    fn range_fetch_matches_on_either_timestamp() {
        let db = Database::open_in_memory().expect("in-memory database");

        let mut due_only = task("due only");
        due_only.due_date = Some("2024-06-05T08:00:00+00:00".to_string());
        db.insert_task(&due_only).unwrap();

        let mut reminder_only = task("reminder only");
        reminder_only.reminder_time = Some("2024-06-20T10:00:00+00:00".to_string());
        db.insert_task(&reminder_only).unwrap();

        let mut outside = task("outside");
        outside.due_date = Some("2024-07-05T08:00:00+00:00".to_string());
        db.insert_task(&outside).unwrap();

        let tasks =
            tasks_in_range(&db, 1, Some("2024-06-01"), Some("2024-06-30")).unwrap();
        let mut titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["due only", "reminder only"]);
    }
}
