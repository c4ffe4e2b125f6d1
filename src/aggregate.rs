//! Task enrichment: a stored row composed with its derived subtask
//! progress and linked tags, in the shape callers consume.

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::models::{Priority, Status, Tag, Task};

/// The caller-facing task: the stored row plus derived fields. The
/// stored `reminder_time` column is surfaced as `reminder`;
/// `from_parts` is the single translation point on the read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<String>,
    pub reminder: Option<String>,
    pub is_read: bool,
    pub progress: i64,
    pub tags: Vec<Tag>,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskView {
    fn from_parts(task: Task, id: i64, progress: i64, tags: Vec<Tag>) -> Self {
        Self {
            id,
            user_id: task.user_id,
            title: task.title,
            description: task.description,
            priority: task.priority,
            status: task.status,
            due_date: task.due_date,
            reminder: task.reminder_time,
            is_read: task.is_read,
            progress,
            tags,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Enrich one stored task. Read-only: progress and tag lookups are
/// additional queries, never mutations.
pub fn aggregate_one(db: &Database, task: Task) -> Result<TaskView> {
    let id = task
        .id
        .ok_or_else(|| Error::Validation("task row is missing an id".to_string()))?;
    let progress = db.task_progress(id)?;
    let tags = db.tags_for_task(id)?;
    Ok(TaskView::from_parts(task, id, progress, tags))
}

/// Enrich a batch of stored tasks, preserving the supplied order.
pub fn aggregate(db: &Database, tasks: Vec<Task>) -> Result<Vec<TaskView>> {
    tasks
        .into_iter()
        .map(|task| aggregate_one(db, task))
        .collect()
}
