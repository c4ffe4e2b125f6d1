//! Partial task updates.
//!
//! `TaskPatch` enumerates the recognized optional fields; anything else a
//! caller supplies simply has nowhere to go, so update statements are
//! built only from this fixed set. Validation and date normalization
//! happen here, before the store sees the patch.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Priority, Status};
use crate::normalize;

/// Caller-supplied partial update. `due` and `reminder` hold raw input
/// and are normalized during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due: Option<String>,
    pub reminder: Option<String>,
}

/// A validated patch, fields named for their storage columns. The
/// caller-facing `reminder` becomes `reminder_time` here; this is the
/// single translation point between the two names on the write path.
#[derive(Debug, Clone)]
pub struct ValidPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<String>,
    pub reminder_time: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due.is_none()
            && self.reminder.is_none()
    }

    /// Validate the patch and normalize its date fields into store-ready
    /// column values.
    pub fn validate(&self) -> Result<ValidPatch> {
        if self.is_empty() {
            return Err(Error::Validation(
                "update must supply at least one field".to_string(),
            ));
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::Validation("title must not be empty".to_string()));
            }
        }
        let due_date = self
            .due
            .as_deref()
            .map(normalize::normalize_due)
            .transpose()?;
        let reminder_time = self
            .reminder
            .as_deref()
            .map(normalize::normalize_reminder)
            .transpose()?;

        Ok(ValidPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
            due_date,
            reminder_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_rejected() {
        let err = TaskPatch::default().validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn blank_title_is_rejected() {
        let patch = TaskPatch {
            title: Some("   ".to_string()),
            ..TaskPatch::default()
        };
        assert!(matches!(patch.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn bad_due_date_is_rejected_before_translation() {
        let patch = TaskPatch {
            due: Some("whenever".to_string()),
            ..TaskPatch::default()
        };
        assert!(matches!(patch.validate(), Err(Error::InvalidDateFormat(_))));
    }

    #[test]
    fn dates_are_normalized_into_column_values() {
        let patch = TaskPatch {
            due: Some("2024-06-10".to_string()),
            reminder: Some("2024-06-09 18:45".to_string()),
            ..TaskPatch::default()
        };
        let valid = patch.validate().unwrap();
        let due = valid.due_date.expect("due date set");
        let reminder = valid.reminder_time.expect("reminder set");
        // Both render as canonical instants; the patch carries them under
        // the storage column names.
        assert!(chrono::DateTime::parse_from_rfc3339(&due).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&reminder).is_ok());
    }

    #[test]
    fn status_only_patch_is_valid() {
        let patch = TaskPatch {
            status: Some(Status::Done),
            ..TaskPatch::default()
        };
        let valid = patch.validate().unwrap();
        assert_eq!(valid.status, Some(Status::Done));
        assert!(valid.title.is_none());
    }
}
