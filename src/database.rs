use rusqlite::Connection;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::{Priority, ReminderEntry, ReminderNotice, Status, Subtask, Tag, Task};
use crate::patch::ValidPatch;
use crate::utils;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::Directory(e.to_string()))?;
            }
        }

        // Open or create the database
        let conn = Connection::open(&db_path)?;

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Open an in-memory database. Used by tests and short-lived tooling.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<()> {
        // Subtasks and tag links follow their task on delete
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         INTEGER NOT NULL,
                title           TEXT NOT NULL,
                description     TEXT,
                priority        TEXT NOT NULL DEFAULT 'medium',
                status          TEXT NOT NULL DEFAULT 'todo',
                due_date        TEXT,
                reminder_time   TEXT,
                is_read         INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS subtasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id         INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                title           TEXT NOT NULL,
                completed       INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tags (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL UNIQUE
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS task_tags (
                task_id         INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                tag_id          INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (task_id, tag_id)
            )",
            [],
        )?;

        // Create indexes
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_reminder_time ON tasks(reminder_time)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_subtasks_task_id ON subtasks(task_id)",
            [],
        )?;

        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Helper function to map a row to a Task
    fn row_to_task(row: &rusqlite::Row) -> std::result::Result<Task, rusqlite::Error> {
        Ok(Task {
            id: Some(row.get(0)?),
            user_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            priority: Priority::from_column(row.get::<_, String>(4)?.as_str()),
            status: Status::from_column(row.get::<_, String>(5)?.as_str()),
            due_date: row.get(6)?,
            reminder_time: row.get(7)?,
            is_read: row.get::<_, i64>(8)? != 0,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    /// Insert a task into the database and return its ID
    pub fn insert_task(&self, task: &Task) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO tasks (user_id, title, description, priority, status, due_date, reminder_time, is_read, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                task.user_id,
                task.title,
                task.description,
                task.priority.as_str(),
                task.status.as_str(),
                task.due_date,
                task.reminder_time,
                if task.is_read { 1 } else { 0 },
                task.created_at,
                task.updated_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all tasks for one user, newest first
    pub fn get_user_tasks(&self, user_id: i64) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, priority, status, due_date, reminder_time, is_read, created_at, updated_at
             FROM tasks WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let tasks = stmt
            .query_map(rusqlite::params![user_id], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Get a single task by ID, scoped to its owner
    pub fn get_task(&self, id: i64, user_id: i64) -> Result<Task> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, priority, status, due_date, reminder_time, is_read, created_at, updated_at
             FROM tasks WHERE id = ?1 AND user_id = ?2",
        )?;
        match stmt.query_row(rusqlite::params![id, user_id], Self::row_to_task) {
            Ok(task) => Ok(task),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("task", id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a validated patch to a task. Absent patch fields keep the
    /// stored value; `updated_at` is always refreshed. Returns the
    /// updated row.
    pub fn update_task(&self, id: i64, user_id: i64, patch: &ValidPatch) -> Result<Task> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE tasks SET
                title = COALESCE(?1, title),
                description = COALESCE(?2, description),
                priority = COALESCE(?3, priority),
                status = COALESCE(?4, status),
                due_date = COALESCE(?5, due_date),
                reminder_time = COALESCE(?6, reminder_time),
                updated_at = ?7
             WHERE id = ?8 AND user_id = ?9",
            rusqlite::params![
                patch.title,
                patch.description,
                patch.priority.map(Priority::as_str),
                patch.status.map(Status::as_str),
                patch.due_date,
                patch.reminder_time,
                utils::now_string(),
                id,
                user_id
            ],
        )?;
        tx.commit()?;
        if changed == 0 {
            return Err(Error::not_found("task", id));
        }
        self.get_task(id, user_id)
    }

    /// Delete a task by ID, scoped to its owner. Subtasks and tag links
    /// cascade.
    pub fn delete_task(&self, id: i64, user_id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
        )?;
        tx.commit()?;
        if changed == 0 {
            return Err(Error::not_found("task", id));
        }
        Ok(())
    }

    /// Subtask completion percentage for a task: round(100 * completed / total),
    /// 0 when the task has no subtasks.
    pub fn task_progress(&self, task_id: i64) -> Result<i64> {
        let (completed, total): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*) FILTER (WHERE completed = 1), COUNT(*)
             FROM subtasks WHERE task_id = ?1",
            rusqlite::params![task_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        if total == 0 {
            return Ok(0);
        }
        Ok(((completed as f64 / total as f64) * 100.0).round() as i64)
    }

    /// Helper function to map a row to a Subtask
    fn row_to_subtask(row: &rusqlite::Row) -> std::result::Result<Subtask, rusqlite::Error> {
        Ok(Subtask {
            id: Some(row.get(0)?),
            task_id: row.get(1)?,
            title: row.get(2)?,
            completed: row.get::<_, i64>(3)? != 0,
            created_at: row.get(4)?,
        })
    }

    /// Add a subtask under a task the user owns
    pub fn add_subtask(&self, user_id: i64, task_id: i64, title: String) -> Result<Subtask> {
        // Ownership gate: resolving the parent fails with NotFound for
        // foreign or absent tasks.
        self.get_task(task_id, user_id)?;

        let subtask = Subtask::new(task_id, title);
        self.conn.execute(
            "INSERT INTO subtasks (task_id, title, completed, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                subtask.task_id,
                subtask.title,
                if subtask.completed { 1 } else { 0 },
                subtask.created_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(Subtask {
            id: Some(id),
            ..subtask
        })
    }

    /// Get all subtasks of a task the user owns, oldest first
    pub fn get_subtasks(&self, user_id: i64, task_id: i64) -> Result<Vec<Subtask>> {
        self.get_task(task_id, user_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, title, completed, created_at
             FROM subtasks WHERE task_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;
        let subtasks = stmt
            .query_map(rusqlite::params![task_id], Self::row_to_subtask)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(subtasks)
    }

    /// Update a subtask's title and/or completed flag. Absent fields keep
    /// the stored value. Returns the updated row.
    pub fn update_subtask(
        &self,
        user_id: i64,
        subtask_id: i64,
        title: Option<String>,
        completed: Option<bool>,
    ) -> Result<Subtask> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE subtasks SET
                title = COALESCE(?1, title),
                completed = COALESCE(?2, completed)
             WHERE id = ?3
               AND task_id IN (SELECT id FROM tasks WHERE user_id = ?4)",
            rusqlite::params![
                title,
                completed.map(|c| if c { 1 } else { 0 }),
                subtask_id,
                user_id
            ],
        )?;
        tx.commit()?;
        if changed == 0 {
            return Err(Error::not_found("subtask", subtask_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, title, completed, created_at
             FROM subtasks WHERE id = ?1",
        )?;
        stmt.query_row(rusqlite::params![subtask_id], Self::row_to_subtask)
            .map_err(Error::from)
    }

    /// Delete a subtask under a task the user owns
    pub fn delete_subtask(&self, user_id: i64, subtask_id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "DELETE FROM subtasks
             WHERE id = ?1
               AND task_id IN (SELECT id FROM tasks WHERE user_id = ?2)",
            rusqlite::params![subtask_id, user_id],
        )?;
        tx.commit()?;
        if changed == 0 {
            return Err(Error::not_found("subtask", subtask_id));
        }
        Ok(())
    }

    /// Create a tag, or return the existing one with the same name
    pub fn create_tag(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("tag name must not be empty".to_string()));
        }
        self.conn.execute(
            "INSERT INTO tags (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            rusqlite::params![name],
        )?;
        let mut stmt = self.conn.prepare("SELECT id, name FROM tags WHERE name = ?1")?;
        stmt.query_row(rusqlite::params![name], |row| {
            Ok(Tag {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })
        .map_err(Error::from)
    }

    /// Get all tags ordered by name
    pub fn get_all_tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM tags ORDER BY name ASC")?;
        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn get_tag(&self, tag_id: i64) -> Result<Tag> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM tags WHERE id = ?1")?;
        match stmt.query_row(rusqlite::params![tag_id], |row| {
            Ok(Tag {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        }) {
            Ok(tag) => Ok(tag),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("tag", tag_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Link a tag to a task the user owns. Linking an already-linked
    /// pair is a no-op, not an error.
    pub fn link_tag(&self, user_id: i64, task_id: i64, tag_id: i64) -> Result<()> {
        self.get_task(task_id, user_id)?;
        self.get_tag(tag_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?1, ?2)",
            rusqlite::params![task_id, tag_id],
        )?;
        Ok(())
    }

    /// Remove a tag link from a task the user owns
    pub fn unlink_tag(&self, user_id: i64, task_id: i64, tag_id: i64) -> Result<()> {
        self.get_task(task_id, user_id)?;
        self.conn.execute(
            "DELETE FROM task_tags WHERE task_id = ?1 AND tag_id = ?2",
            rusqlite::params![task_id, tag_id],
        )?;
        Ok(())
    }

    /// Get the tags linked to a task
    pub fn tags_for_task(&self, task_id: i64) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT tags.id, tags.name
             FROM tags
             JOIN task_tags ON tags.id = task_tags.tag_id
             WHERE task_tags.task_id = ?1
             ORDER BY tags.name ASC",
        )?;
        let tags = stmt
            .query_map(rusqlite::params![task_id], |row| {
                Ok(Tag {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Get all of a user's tasks carrying a tag, newest first
    pub fn tasks_by_tag(&self, user_id: i64, tag_id: i64) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.user_id, t.title, t.description, t.priority, t.status, t.due_date, t.reminder_time, t.is_read, t.created_at, t.updated_at
             FROM tasks t
             JOIN task_tags tt ON t.id = tt.task_id
             WHERE t.user_id = ?1 AND tt.tag_id = ?2
             ORDER BY t.created_at DESC, t.id DESC",
        )?;
        let tasks = stmt
            .query_map(rusqlite::params![user_id, tag_id], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Get all of a user's tasks whose due date or reminder falls inside
    /// the closed date range (`YYYY-MM-DD` keys)
    pub fn tasks_between(&self, user_id: i64, start_key: &str, end_key: &str) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, priority, status, due_date, reminder_time, is_read, created_at, updated_at
             FROM tasks
             WHERE user_id = ?1
               AND ((due_date IS NOT NULL AND substr(due_date, 1, 10) BETWEEN ?2 AND ?3)
                 OR (reminder_time IS NOT NULL AND substr(reminder_time, 1, 10) BETWEEN ?2 AND ?3))
             ORDER BY due_date ASC, id ASC",
        )?;
        let tasks = stmt
            .query_map(rusqlite::params![user_id, start_key, end_key], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Task counts per status plus grand total
    pub fn count_by_status(&self, user_id: i64) -> Result<(i64, i64, i64, i64)> {
        self.conn
            .query_row(
                "SELECT
                    COUNT(*) FILTER (WHERE status = 'todo'),
                    COUNT(*) FILTER (WHERE status = 'in_progress'),
                    COUNT(*) FILTER (WHERE status = 'done'),
                    COUNT(*)
                 FROM tasks WHERE user_id = ?1",
                rusqlite::params![user_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .map_err(Error::from)
    }

    /// Count of tasks done with `updated_at` on the given date
    pub fn completed_on(&self, user_id: i64, date_key: &str) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM tasks
                 WHERE user_id = ?1 AND status = 'done'
                   AND substr(updated_at, 1, 10) = ?2",
                rusqlite::params![user_id, date_key],
                |row| row.get(0),
            )
            .map_err(Error::from)
    }

    /// Count of tasks done with `updated_at` inside the closed date range
    pub fn completed_between(&self, user_id: i64, start_key: &str, end_key: &str) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM tasks
                 WHERE user_id = ?1 AND status = 'done'
                   AND substr(updated_at, 1, 10) BETWEEN ?2 AND ?3",
                rusqlite::params![user_id, start_key, end_key],
                |row| row.get(0),
            )
            .map_err(Error::from)
    }

    /// Distinct dates with at least one completion, most recent first
    pub fn done_dates(&self, user_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT substr(updated_at, 1, 10) AS date
             FROM tasks
             WHERE user_id = ?1 AND status = 'done'
             ORDER BY date DESC",
        )?;
        let dates = stmt
            .query_map(rusqlite::params![user_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(dates)
    }

    /// Per-day task creation counts from the given date onward
    pub fn created_counts_since(&self, user_id: i64, start_key: &str) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT substr(created_at, 1, 10) AS date, COUNT(*)
             FROM tasks
             WHERE user_id = ?1 AND substr(created_at, 1, 10) >= ?2
             GROUP BY date ORDER BY date ASC",
        )?;
        let counts = stmt
            .query_map(rusqlite::params![user_id, start_key], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// Per-day completion counts (done status, `updated_at` date) from the
    /// given date onward
    pub fn completed_counts_since(
        &self,
        user_id: i64,
        start_key: &str,
    ) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT substr(updated_at, 1, 10) AS date, COUNT(*)
             FROM tasks
             WHERE user_id = ?1 AND status = 'done'
               AND substr(updated_at, 1, 10) >= ?2
             GROUP BY date ORDER BY date ASC",
        )?;
        let counts = stmt
            .query_map(rusqlite::params![user_id, start_key], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// Tasks whose reminder lands on the given minute (`YYYY-MM-DDTHH:MM`).
    /// The sweep is system-wide, not per user.
    pub fn reminders_at_minute(&self, minute_key: &str) -> Result<Vec<ReminderNotice>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title FROM tasks
             WHERE reminder_time IS NOT NULL
               AND substr(reminder_time, 1, 16) = ?1",
        )?;
        let notices = stmt
            .query_map(rusqlite::params![minute_key], |row| {
                Ok(ReminderNotice {
                    task_id: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notices)
    }

    /// A user's most recent reminders that have already fired, newest
    /// first, bounded by `limit`
    pub fn recent_reminders(
        &self,
        user_id: i64,
        now_instant: &str,
        limit: i64,
    ) -> Result<Vec<ReminderEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, reminder_time, is_read, due_date
             FROM tasks
             WHERE user_id = ?1
               AND reminder_time IS NOT NULL
               AND reminder_time <= ?2
             ORDER BY reminder_time DESC
             LIMIT ?3",
        )?;
        let entries = stmt
            .query_map(rusqlite::params![user_id, now_instant, limit], |row| {
                Ok(ReminderEntry {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    reminder: row.get(2)?,
                    is_read: row.get::<_, i64>(3)? != 0,
                    due_date: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Mark a task's reminder notification as read
    pub fn mark_reminder_read(&self, user_id: i64, task_id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![task_id, user_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("task", task_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Database {
        Database::open_in_memory().expect("in-memory database")
    }

    fn insert(db: &Database, user_id: i64, title: &str) -> i64 {
        db.insert_task(&Task::new(user_id, title.to_string()))
            .expect("insert task")
    }

    #[test]
    fn progress_is_zero_without_subtasks() {
        let db = seeded();
        let task_id = insert(&db, 1, "solo");
        assert_eq!(db.task_progress(task_id).unwrap(), 0);
    }

    #[test]
    fn progress_rounds_completed_share() {
        let db = seeded();
        let task_id = insert(&db, 1, "threes");
        for title in ["a", "b", "c"] {
            db.add_subtask(1, task_id, title.to_string()).unwrap();
        }
        let subtasks = db.get_subtasks(1, task_id).unwrap();
        db.update_subtask(1, subtasks[0].id.unwrap(), None, Some(true))
            .unwrap();
        // 1 of 3 -> round(33.33) = 33
        assert_eq!(db.task_progress(task_id).unwrap(), 33);
        db.update_subtask(1, subtasks[1].id.unwrap(), None, Some(true))
            .unwrap();
        // 2 of 3 -> round(66.67) = 67
        assert_eq!(db.task_progress(task_id).unwrap(), 67);
    }

    #[test]
    fn tag_linking_is_idempotent() {
        let db = seeded();
        let task_id = insert(&db, 1, "tagged");
        let tag = db.create_tag("home").unwrap();
        let tag_id = tag.id.unwrap();

        db.link_tag(1, task_id, tag_id).unwrap();
        db.link_tag(1, task_id, tag_id).unwrap();

        assert_eq!(db.tags_for_task(task_id).unwrap().len(), 1);
    }

    #[test]
    fn create_tag_upserts_by_name() {
        let db = seeded();
        let first = db.create_tag("errands").unwrap();
        let second = db.create_tag("errands").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(db.get_all_tags().unwrap().len(), 1);
    }

    #[test]
    fn minute_scan_reports_each_match_once() {
        let db = seeded();
        let mut task = Task::new(1, "standup".to_string());
        task.reminder_time = Some("2024-06-12T09:30:00+00:00".to_string());
        db.insert_task(&task).unwrap();

        let mut other = Task::new(2, "lunch".to_string());
        other.reminder_time = Some("2024-06-12T12:00:00+00:00".to_string());
        db.insert_task(&other).unwrap();

        let notices = db.reminders_at_minute("2024-06-12T09:30").unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "standup");

        // A repeated scan of the same tick reports the same single match,
        // not an accumulation.
        let again = db.reminders_at_minute("2024-06-12T09:30").unwrap();
        assert_eq!(again, notices);
    }

    #[test]
    fn deleting_a_task_cascades_subtasks_and_links() {
        let db = seeded();
        let task_id = insert(&db, 1, "parent");
        db.add_subtask(1, task_id, "child".to_string()).unwrap();
        let tag = db.create_tag("doomed").unwrap();
        db.link_tag(1, task_id, tag.id.unwrap()).unwrap();

        db.delete_task(task_id, 1).unwrap();

        let orphans: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM subtasks", [], |row| row.get(0))
            .unwrap();
        let links: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM task_tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
        assert_eq!(links, 0);
    }
}
