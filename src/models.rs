use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::utils;

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// String stored in the priority column.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Map a stored column value, falling back to the default for
    /// anything unrecognized.
    pub fn from_column(value: &str) -> Self {
        match value {
            "urgent" => Priority::Urgent,
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(Error::Validation(format!("unknown priority: {other}"))),
        }
    }
}

/// Task workflow status. No transition rules are enforced beyond the
/// enum domain; transitions are caller-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    /// String stored in the status column.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }

    pub fn from_column(value: &str) -> Self {
        match value {
            "in_progress" => Status::InProgress,
            "done" => Status::Done,
            _ => Status::Todo,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Todo
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Status::Todo),
            "in_progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(Error::Validation(format!("unknown status: {other}"))),
        }
    }
}

/// A stored task row. Instants (`due_date`, `reminder_time`, `created_at`,
/// `updated_at`) are RFC 3339 UTC strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<String>,
    pub reminder_time: Option<String>,
    pub is_read: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn new(user_id: i64, title: String) -> Self {
        let now = utils::now_string();
        Self {
            id: None,
            user_id,
            title,
            description: None,
            priority: Priority::default(),
            status: Status::default(),
            due_date: None,
            reminder_time: None,
            is_read: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A subtask row, owned by its parent task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Option<i64>,
    pub task_id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
}

impl Subtask {
    pub fn new(task_id: i64, title: String) -> Self {
        Self {
            id: None,
            task_id,
            title,
            completed: false,
            created_at: utils::now_string(),
        }
    }
}

/// A tag, unique by name, linked to tasks many-to-many.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Option<i64>,
    pub name: String,
}

/// Notification emitted by the reminder sweep for a task whose reminder
/// lands on the scanned minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderNotice {
    pub task_id: i64,
    pub title: String,
}

/// A row from the recent-reminder listing. The stored `reminder_time`
/// column is surfaced under the caller-facing `reminder` name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderEntry {
    pub id: i64,
    pub title: String,
    pub reminder: String,
    pub is_read: bool,
    pub due_date: Option<String>,
}
