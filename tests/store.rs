use taskmate::models::{Status, Task};
use taskmate::patch::TaskPatch;
use taskmate::{Database, Error, aggregate, stats, utils};

fn insert_task(db: &Database, user_id: i64, title: &str) -> i64 {
    db.insert_task(&Task::new(user_id, title.to_string()))
        .expect("insert task")
}

fn done_patch() -> taskmate::patch::ValidPatch {
    TaskPatch {
        status: Some(Status::Done),
        ..TaskPatch::default()
    }
    .validate()
    .expect("valid patch")
}

#[test]
fn foreign_tasks_are_invisible() {
    let db = Database::open_in_memory().expect("in-memory database");
    let theirs = insert_task(&db, 2, "secret");

    assert!(matches!(
        db.get_task(theirs, 1),
        Err(Error::NotFound { kind: "task", .. })
    ));
    assert!(matches!(
        db.update_task(theirs, 1, &done_patch()),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        db.delete_task(theirs, 1),
        Err(Error::NotFound { .. })
    ));

    // The row itself is untouched by the failed update and delete.
    let row = db.get_task(theirs, 2).expect("owner still sees it");
    assert_eq!(row.status, Status::Todo);
}

#[test]
fn foreign_subtasks_and_links_are_invisible() {
    let db = Database::open_in_memory().expect("in-memory database");
    let theirs = insert_task(&db, 2, "secret");
    let subtask = db
        .add_subtask(2, theirs, "step".to_string())
        .expect("add subtask");

    assert!(matches!(
        db.add_subtask(1, theirs, "intruder".to_string()),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        db.get_subtasks(1, theirs),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        db.update_subtask(1, subtask.id.unwrap(), None, Some(true)),
        Err(Error::NotFound { kind: "subtask", .. })
    ));
    assert!(matches!(
        db.delete_subtask(1, subtask.id.unwrap()),
        Err(Error::NotFound { .. })
    ));

    let tag = db.create_tag("private").expect("create tag");
    assert!(matches!(
        db.link_tag(1, theirs, tag.id.unwrap()),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn update_applies_partial_fields_and_keeps_the_rest() {
    let db = Database::open_in_memory().expect("in-memory database");
    let mut task = Task::new(1, "draft".to_string());
    task.description = Some("first pass".to_string());
    let id = db.insert_task(&task).expect("insert task");

    let patch = TaskPatch {
        title: Some("final".to_string()),
        due: Some("2024-06-10".to_string()),
        ..TaskPatch::default()
    };
    let updated = db
        .update_task(id, 1, &patch.validate().expect("valid patch"))
        .expect("update");

    assert_eq!(updated.title, "final");
    assert_eq!(updated.description.as_deref(), Some("first pass"));
    assert!(updated.due_date.is_some());
    assert_eq!(updated.status, Status::Todo);
}

#[test]
fn listed_tasks_come_back_enriched() {
    let db = Database::open_in_memory().expect("in-memory database");
    let id = insert_task(&db, 1, "project");
    db.add_subtask(1, id, "half one".to_string()).expect("subtask");
    db.add_subtask(1, id, "half two".to_string()).expect("subtask");
    let subtasks = db.get_subtasks(1, id).expect("subtasks");
    db.update_subtask(1, subtasks[0].id.unwrap(), None, Some(true))
        .expect("complete one");
    let tag = db.create_tag("deep-work").expect("tag");
    db.link_tag(1, id, tag.id.unwrap()).expect("link");

    let views = aggregate::aggregate(&db, db.get_user_tasks(1).expect("list")).expect("aggregate");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].progress, 50);
    assert_eq!(views[0].tags[0].name, "deep-work");
}

#[test]
fn recent_reminders_are_bounded_owner_scoped_and_past_only() {
    let db = Database::open_in_memory().expect("in-memory database");

    for (hour, title) in [(1, "first"), (2, "second"), (3, "third")] {
        let mut task = Task::new(1, title.to_string());
        task.reminder_time = Some(format!("2024-06-10T0{}:00:00+00:00", hour));
        db.insert_task(&task).expect("insert");
    }
    let mut foreign = Task::new(2, "not yours".to_string());
    foreign.reminder_time = Some("2024-06-10T04:00:00+00:00".to_string());
    db.insert_task(&foreign).expect("insert");

    let mut future = Task::new(1, "later".to_string());
    future.reminder_time = Some("2099-01-01T00:00:00+00:00".to_string());
    db.insert_task(&future).expect("insert");

    let entries = db
        .recent_reminders(1, &utils::now_string(), 2)
        .expect("recent reminders");
    let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
    // Newest first, capped at two, no foreign or future rows.
    assert_eq!(titles, vec!["third", "second"]);
    assert!(entries.iter().all(|e| !e.is_read));
}

#[test]
fn mark_read_is_owner_scoped() {
    let db = Database::open_in_memory().expect("in-memory database");
    let mut task = Task::new(2, "theirs".to_string());
    task.reminder_time = Some("2024-06-10T09:00:00+00:00".to_string());
    let id = db.insert_task(&task).expect("insert");

    assert!(matches!(
        db.mark_reminder_read(1, id),
        Err(Error::NotFound { .. })
    ));

    db.mark_reminder_read(2, id).expect("owner marks read");
    let row = db.get_task(id, 2).expect("fetch");
    assert!(row.is_read);
}

#[test]
fn stats_only_see_the_requesting_user() {
    let db = Database::open_in_memory().expect("in-memory database");
    let mine = insert_task(&db, 1, "mine");
    let theirs = insert_task(&db, 2, "theirs");
    db.update_task(mine, 1, &done_patch()).expect("complete mine");
    db.update_task(theirs, 2, &done_patch())
        .expect("complete theirs");

    let today = utils::today();
    let counts = stats::status_counts(&db, 1, today).expect("counts");
    assert_eq!(counts.total, 1);
    assert_eq!(counts.done, 1);

    let streak = stats::streak(&db, 1, today).expect("streak");
    assert_eq!(streak.current, 1);
    assert_eq!(streak.longest, 1);

    let summary = stats::weekly_summary(&db, 1, today).expect("summary");
    assert_eq!(summary.len(), 7);
    let today_entry = &summary[6];
    assert_eq!(today_entry.date, today.to_string());
    assert_eq!(today_entry.created, 1);
    assert_eq!(today_entry.completed, 1);
    assert_eq!(today_entry.percentage, 100);
}
