//! Derived statistics over one user's tasks: status counts, the
//! consecutive-day completion streak, and the 7-day creation/completion
//! summary.
//!
//! The walking logic is pure and takes `today` explicitly; the store
//! supplies raw date lists and counts.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::database::Database;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
    pub total: i64,
    pub completed_today: i64,
    pub completed_this_week: i64,
}

/// Task counts by status, plus completions today and inside the current
/// ISO week (Monday through Sunday).
pub fn status_counts(db: &Database, user_id: i64, today: NaiveDate) -> Result<StatusCounts> {
    let (todo, in_progress, done, total) = db.count_by_status(user_id)?;
    let completed_today = db.completed_on(user_id, &today.to_string())?;

    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let week_end = week_start + Duration::days(6);
    let completed_this_week =
        db.completed_between(user_id, &week_start.to_string(), &week_end.to_string())?;

    Ok(StatusCounts {
        todo,
        in_progress,
        done,
        total,
        completed_today,
        completed_this_week,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
}

/// Completion streak for a user. One calendar day with at least one
/// completion is one streak unit.
pub fn streak(db: &Database, user_id: i64, today: NaiveDate) -> Result<Streak> {
    let mut dates = Vec::new();
    for raw in db.done_dates(user_id)? {
        let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| Error::InvalidDateFormat(raw.clone()))?;
        dates.push(date);
    }
    Ok(streak_from_dates(&dates, today))
}

/// Walk distinct completion dates (descending). `current` is the run of
/// consecutive dates anchored at today; a day without a completion
/// (including today itself) ends it. `longest` is the longest
/// consecutive-day run anywhere in the history.
pub fn streak_from_dates(dates: &[NaiveDate], today: NaiveDate) -> Streak {
    let mut current = 0u32;
    let mut expected = today;
    for &date in dates {
        if date != expected {
            break;
        }
        current += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &date in dates {
        run = match prev {
            Some(p) if p.pred_opt() == Some(date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    Streak { current, longest }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub created: i64,
    pub completed: i64,
    pub percentage: i64,
}

/// The 7 days ending today, oldest first. Days without activity appear
/// with zeros; the window is dense, never sparse.
pub fn weekly_summary(db: &Database, user_id: i64, today: NaiveDate) -> Result<Vec<DailySummary>> {
    let start = today - Duration::days(6);
    let created: HashMap<String, i64> = db
        .created_counts_since(user_id, &start.to_string())?
        .into_iter()
        .collect();
    let completed: HashMap<String, i64> = db
        .completed_counts_since(user_id, &start.to_string())?
        .into_iter()
        .collect();
    Ok(summarize_week(&created, &completed, today))
}

/// Assemble the dense 7-day window from per-day count maps. `completed`
/// counts tasks reaching done that day; percentage is
/// round(100 * completed / created), 0 when nothing was created.
pub fn summarize_week(
    created: &HashMap<String, i64>,
    completed: &HashMap<String, i64>,
    today: NaiveDate,
) -> Vec<DailySummary> {
    (0..7)
        .map(|offset| {
            let date = (today - Duration::days(6 - offset)).to_string();
            let created_count = created.get(&date).copied().unwrap_or(0);
            let completed_count = completed.get(&date).copied().unwrap_or(0);
            let percentage = if created_count == 0 {
                0
            } else {
                ((completed_count as f64 / created_count as f64) * 100.0).round() as i64
            };
            DailySummary {
                date,
                created: created_count,
                completed: completed_count,
                percentage,
            }
        })
        .collect()
}
