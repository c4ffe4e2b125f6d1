use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::aggregate;
use crate::calendar;
use crate::database::Database;
use crate::models::Task;
use crate::normalize;
use crate::patch::TaskPatch;
use crate::stats;
use crate::sweeper::ReminderSweeper;
use crate::utils;

#[derive(Parser)]
#[command(name = "taskmate")]
#[command(about = "Personal task manager with tags, subtasks, calendar view, streaks and reminders")]
#[command(version)]
pub struct Cli {
    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    /// Act as this user id (defaults to the configured user)
    #[arg(long)]
    pub user: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a task
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// urgent, high, medium or low
        #[arg(long)]
        priority: Option<String>,
        /// Due date (e.g. 2024-06-10 or 2024-06-10 14:30)
        #[arg(long)]
        due: Option<String>,
        /// Reminder instant (e.g. 2024-06-10 09:30)
        #[arg(long)]
        reminder: Option<String>,
        /// Comma-separated tag names
        #[arg(long)]
        tags: Option<String>,
    },
    /// List tasks, enriched with progress and tags
    List {
        /// Only tasks carrying this tag id
        #[arg(long)]
        tag: Option<i64>,
    },
    /// Show a single task
    Show { id: i64 },
    /// Update task fields
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// urgent, high, medium or low
        #[arg(long)]
        priority: Option<String>,
        /// todo, in_progress or done
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        reminder: Option<String>,
    },
    /// Delete a task
    Delete { id: i64 },
    /// Add a subtask to a task
    AddSubtask { task_id: i64, title: String },
    /// List a task's subtasks
    Subtasks { task_id: i64 },
    /// Update a subtask's title or completion
    UpdateSubtask {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a subtask
    DeleteSubtask { id: i64 },
    /// Create a tag (returns the existing one if the name is taken)
    AddTag { name: String },
    /// List all tags
    Tags,
    /// Link tags to a task
    Tag { task_id: i64, tag_ids: Vec<i64> },
    /// Unlink a tag from a task
    Untag { task_id: i64, tag_id: i64 },
    /// Tasks with a due date or reminder inside a date range
    Range { start: String, end: String },
    /// Day-bucketed calendar view for a date range
    Calendar { start: String, end: String },
    /// Task counts by status
    Stats,
    /// Completion streak
    Streak,
    /// Creation/completion counts for the last 7 days
    Weekly,
    /// Recently fired reminders, newest first
    Reminders {
        #[arg(long, default_value_t = 5)]
        limit: i64,
    },
    /// Mark a reminder notification as read
    MarkRead { id: i64 },
    /// Run the reminder sweep loop until interrupted
    Sweep,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Task(#[from] crate::error::Error),
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Route a parsed command to its handler
pub fn dispatch(
    command: Commands,
    db: &Database,
    user_id: i64,
    db_path: &str,
    sweep_period: Duration,
) -> Result<(), CliError> {
    match command {
        Commands::Add {
            title,
            description,
            priority,
            due,
            reminder,
            tags,
        } => handle_add_task(db, user_id, title, description, priority, due, reminder, tags),
        Commands::List { tag } => handle_list_tasks(db, user_id, tag),
        Commands::Show { id } => handle_show_task(db, user_id, id),
        Commands::Update {
            id,
            title,
            description,
            priority,
            status,
            due,
            reminder,
        } => handle_update_task(db, user_id, id, title, description, priority, status, due, reminder),
        Commands::Delete { id } => handle_delete_task(db, user_id, id),
        Commands::AddSubtask { task_id, title } => handle_add_subtask(db, user_id, task_id, title),
        Commands::Subtasks { task_id } => handle_subtasks(db, user_id, task_id),
        Commands::UpdateSubtask {
            id,
            title,
            completed,
        } => handle_update_subtask(db, user_id, id, title, completed),
        Commands::DeleteSubtask { id } => handle_delete_subtask(db, user_id, id),
        Commands::AddTag { name } => handle_add_tag(db, name),
        Commands::Tags => handle_tags(db),
        Commands::Tag { task_id, tag_ids } => handle_tag_task(db, user_id, task_id, tag_ids),
        Commands::Untag { task_id, tag_id } => handle_untag_task(db, user_id, task_id, tag_id),
        Commands::Range { start, end } => handle_range(db, user_id, start, end),
        Commands::Calendar { start, end } => handle_calendar(db, user_id, start, end),
        Commands::Stats => handle_stats(db, user_id),
        Commands::Streak => handle_streak(db, user_id),
        Commands::Weekly => handle_weekly(db, user_id),
        Commands::Reminders { limit } => handle_reminders(db, user_id, limit),
        Commands::MarkRead { id } => handle_mark_read(db, user_id, id),
        Commands::Sweep => handle_sweep(db_path, sweep_period),
    }
}

/// Handle the add command
#[allow(clippy::too_many_arguments)]
pub fn handle_add_task(
    db: &Database,
    user_id: i64,
    title: String,
    description: Option<String>,
    priority: Option<String>,
    due: Option<String>,
    reminder: Option<String>,
    tags: Option<String>,
) -> Result<(), CliError> {
    if title.trim().is_empty() {
        return Err(crate::error::Error::Validation("title is required".to_string()).into());
    }

    let mut task = Task::new(user_id, title);
    task.description = description;
    if let Some(priority) = priority {
        task.priority = priority.parse()?;
    }
    task.due_date = due.as_deref().map(normalize::normalize_due).transpose()?;
    task.reminder_time = reminder
        .as_deref()
        .map(normalize::normalize_reminder)
        .transpose()?;

    let id = db.insert_task(&task)?;

    if let Some(tags) = tags {
        for name in tags.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let tag = db.create_tag(name)?;
            if let Some(tag_id) = tag.id {
                db.link_tag(user_id, id, tag_id)?;
            }
        }
    }

    let view = aggregate::aggregate_one(db, db.get_task(id, user_id)?)?;
    print_json(&view)
}

/// Handle the list command
pub fn handle_list_tasks(db: &Database, user_id: i64, tag: Option<i64>) -> Result<(), CliError> {
    let tasks = match tag {
        Some(tag_id) => db.tasks_by_tag(user_id, tag_id)?,
        None => db.get_user_tasks(user_id)?,
    };
    let views = aggregate::aggregate(db, tasks)?;
    print_json(&views)
}

/// Handle the show command
pub fn handle_show_task(db: &Database, user_id: i64, id: i64) -> Result<(), CliError> {
    let view = aggregate::aggregate_one(db, db.get_task(id, user_id)?)?;
    print_json(&view)
}

/// Handle the update command
#[allow(clippy::too_many_arguments)]
pub fn handle_update_task(
    db: &Database,
    user_id: i64,
    id: i64,
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due: Option<String>,
    reminder: Option<String>,
) -> Result<(), CliError> {
    let patch = TaskPatch {
        title,
        description,
        priority: priority.map(|p| p.parse()).transpose()?,
        status: status.map(|s| s.parse()).transpose()?,
        due,
        reminder,
    };
    let task = db.update_task(id, user_id, &patch.validate()?)?;
    let view = aggregate::aggregate_one(db, task)?;
    print_json(&view)
}

/// Handle the delete command
pub fn handle_delete_task(db: &Database, user_id: i64, id: i64) -> Result<(), CliError> {
    db.delete_task(id, user_id)?;
    println!("Task {} deleted", id);
    Ok(())
}

/// Handle the add-subtask command
pub fn handle_add_subtask(
    db: &Database,
    user_id: i64,
    task_id: i64,
    title: String,
) -> Result<(), CliError> {
    if title.trim().is_empty() {
        return Err(crate::error::Error::Validation("title is required".to_string()).into());
    }
    let subtask = db.add_subtask(user_id, task_id, title)?;
    print_json(&subtask)
}

/// Handle the subtasks command
pub fn handle_subtasks(db: &Database, user_id: i64, task_id: i64) -> Result<(), CliError> {
    let subtasks = db.get_subtasks(user_id, task_id)?;
    print_json(&subtasks)
}

/// Handle the update-subtask command
pub fn handle_update_subtask(
    db: &Database,
    user_id: i64,
    id: i64,
    title: Option<String>,
    completed: Option<bool>,
) -> Result<(), CliError> {
    let subtask = db.update_subtask(user_id, id, title, completed)?;
    print_json(&subtask)
}

/// Handle the delete-subtask command
pub fn handle_delete_subtask(db: &Database, user_id: i64, id: i64) -> Result<(), CliError> {
    db.delete_subtask(user_id, id)?;
    println!("Subtask {} deleted", id);
    Ok(())
}

/// Handle the add-tag command
pub fn handle_add_tag(db: &Database, name: String) -> Result<(), CliError> {
    let tag = db.create_tag(&name)?;
    print_json(&tag)
}

/// Handle the tags command
pub fn handle_tags(db: &Database) -> Result<(), CliError> {
    let tags = db.get_all_tags()?;
    print_json(&tags)
}

/// Handle the tag command
pub fn handle_tag_task(
    db: &Database,
    user_id: i64,
    task_id: i64,
    tag_ids: Vec<i64>,
) -> Result<(), CliError> {
    if tag_ids.is_empty() {
        return Err(
            crate::error::Error::Validation("at least one tag id is required".to_string()).into(),
        );
    }
    for tag_id in tag_ids {
        db.link_tag(user_id, task_id, tag_id)?;
    }
    println!("Tags linked to task {}", task_id);
    Ok(())
}

/// Handle the untag command
pub fn handle_untag_task(
    db: &Database,
    user_id: i64,
    task_id: i64,
    tag_id: i64,
) -> Result<(), CliError> {
    db.unlink_tag(user_id, task_id, tag_id)?;
    println!("Tag {} removed from task {}", tag_id, task_id);
    Ok(())
}

/// Handle the range command
pub fn handle_range(db: &Database, user_id: i64, start: String, end: String) -> Result<(), CliError> {
    let tasks = calendar::tasks_in_range(db, user_id, Some(&start), Some(&end))?;
    print_json(&tasks)
}

/// Handle the calendar command
pub fn handle_calendar(
    db: &Database,
    user_id: i64,
    start: String,
    end: String,
) -> Result<(), CliError> {
    let projection = calendar::project_range(db, user_id, Some(&start), Some(&end))?;
    print_json(&projection)
}

/// Handle the stats command
pub fn handle_stats(db: &Database, user_id: i64) -> Result<(), CliError> {
    let counts = stats::status_counts(db, user_id, utils::today())?;
    print_json(&counts)
}

/// Handle the streak command
pub fn handle_streak(db: &Database, user_id: i64) -> Result<(), CliError> {
    let streak = stats::streak(db, user_id, utils::today())?;
    print_json(&streak)
}

/// Handle the weekly command
pub fn handle_weekly(db: &Database, user_id: i64) -> Result<(), CliError> {
    let summary = stats::weekly_summary(db, user_id, utils::today())?;
    print_json(&summary)
}

/// Handle the reminders command
pub fn handle_reminders(db: &Database, user_id: i64, limit: i64) -> Result<(), CliError> {
    let reminders = db.recent_reminders(user_id, &utils::now_string(), limit)?;
    print_json(&reminders)
}

/// Handle the mark-read command
pub fn handle_mark_read(db: &Database, user_id: i64, id: i64) -> Result<(), CliError> {
    db.mark_reminder_read(user_id, id)?;
    println!("Reminder marked as read");
    Ok(())
}

/// Handle the sweep command: run the sweeper until Ctrl-C, printing each
/// notice as it fires
pub fn handle_sweep(db_path: &str, period: Duration) -> Result<(), CliError> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let (handle, mut notices) = ReminderSweeper::new(db_path).with_period(period).spawn()?;
        println!("Reminder sweep running (Ctrl-C to stop)");
        loop {
            tokio::select! {
                maybe = notices.recv() => match maybe {
                    Some(notice) => {
                        println!("Reminder: task {} \"{}\" is due now", notice.task_id, notice.title);
                    }
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => break,
            }
        }
        handle.shutdown().await;
        Ok(())
    })
}
