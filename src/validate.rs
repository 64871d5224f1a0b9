//! Form validation for task input.
//!
//! Checks a raw form payload and produces either a normalized payload
//! ready for the store or a list of field-level messages for the UI.
//! Expected-invalid input is a value, never a panic; a payload of the
//! wrong shape entirely is the caller's serde layer to reject.

use crate::task::{Priority, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 1000;
const CATEGORY_MAX: usize = 50;
const TAG_MAX: usize = 30;
const TAGS_MAX: usize = 10;

// ── Form input ─────────────────────────────────────────────────

/// Raw task form input, as the UI submits it. Missing status/priority
/// fall back to their defaults during validation; an empty due-date
/// string means "no due date".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: String,
    pub due_date: Option<String>,
    pub tags: Vec<String>,
}

/// A validated, normalized task payload — what the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

// ── Errors ─────────────────────────────────────────────────────

/// One failed check, tied to the offending form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Everything wrong with a submitted form, in field order. The UI
/// renders each message next to its field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", .errors.iter().map(|e| e.field).collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// First message for a given field, if it failed.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

// ── Validation ─────────────────────────────────────────────────

/// Check a form against the schema. Returns the normalized payload or
/// every field-level failure at once.
pub fn validate(form: &TaskForm) -> Result<TaskPayload, ValidationErrors> {
    validate_at(form, Utc::now())
}

/// Deterministic variant: `now` anchors the future-due-date rule.
pub fn validate_at(form: &TaskForm, now: DateTime<Utc>) -> Result<TaskPayload, ValidationErrors> {
    let mut errors = Vec::new();
    let mut fail = |field, message: &str| {
        errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    };

    if form.title.is_empty() {
        fail("title", "Title is required");
    } else if form.title.chars().count() > TITLE_MAX {
        fail("title", "Title must be less than 100 characters");
    }

    if form.description.chars().count() > DESCRIPTION_MAX {
        fail("description", "Description must be less than 1000 characters");
    }

    if form.category.is_empty() {
        fail("category", "Category is required");
    } else if form.category.chars().count() > CATEGORY_MAX {
        fail("category", "Category must be less than 50 characters");
    }

    let due_date = match form.due_date.as_deref() {
        None | Some("") => None,
        Some(raw) => match parse_due_date(raw) {
            None => {
                fail("dueDate", "Invalid date format");
                None
            }
            Some(due) if due <= now => {
                fail("dueDate", "Due date must be in the future");
                None
            }
            Some(due) => Some(due),
        },
    };

    if form.tags.len() > TAGS_MAX {
        fail("tags", "Maximum 10 tags allowed");
    }
    if form.tags.iter().any(|t| t.chars().count() > TAG_MAX) {
        fail("tags", "Tag must be less than 30 characters");
    }

    if !errors.is_empty() {
        return Err(ValidationErrors { errors });
    }

    Ok(TaskPayload {
        title: form.title.clone(),
        description: form.description.clone(),
        status: form.status.unwrap_or_default(),
        priority: form.priority.unwrap_or_default(),
        category: form.category.clone(),
        due_date,
        tags: form.tags.clone(),
    })
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD` date-picker value (read as
/// UTC midnight).
fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Timelike};

    fn form(title: &str, category: &str) -> TaskForm {
        TaskForm {
            title: title.into(),
            category: category.into(),
            ..TaskForm::default()
        }
    }

    #[test]
    fn minimal_form_gets_defaults() {
        let payload = validate(&form("Ship report", "Work")).unwrap();
        assert_eq!(payload.status, TaskStatus::Pending);
        assert_eq!(payload.priority, Priority::Medium);
        assert_eq!(payload.description, "");
        assert_eq!(payload.due_date, None);
        assert!(payload.tags.is_empty());
    }

    #[test]
    fn empty_title_is_required() {
        let err = validate(&form("", "Work")).unwrap_err();
        assert_eq!(err.field("title"), Some("Title is required"));
    }

    #[test]
    fn title_length_boundary() {
        let exactly_100: String = "a".repeat(100);
        assert!(validate(&form(&exactly_100, "Work")).is_ok());

        let over: String = "a".repeat(101);
        let err = validate(&form(&over, "Work")).unwrap_err();
        assert_eq!(err.field("title"), Some("Title must be less than 100 characters"));
    }

    #[test]
    fn category_rules() {
        let err = validate(&form("Ship report", "")).unwrap_err();
        assert_eq!(err.field("category"), Some("Category is required"));

        let err = validate(&form("Ship report", &"c".repeat(51))).unwrap_err();
        assert_eq!(err.field("category"), Some("Category must be less than 50 characters"));
    }

    #[test]
    fn due_date_must_be_in_the_future() {
        let now = Utc::now();

        let mut f = form("Ship report", "Work");
        f.due_date = Some((now - Duration::days(1)).to_rfc3339());
        let err = validate_at(&f, now).unwrap_err();
        assert_eq!(err.field("dueDate"), Some("Due date must be in the future"));

        f.due_date = Some((now + Duration::days(1)).to_rfc3339());
        let payload = validate_at(&f, now).unwrap();
        assert!(payload.due_date.unwrap() > now);
    }

    #[test]
    fn due_date_accepts_bare_dates() {
        let now = Utc::now();
        let mut f = form("Ship report", "Work");
        f.due_date = Some(
            (now + Duration::days(30)).date_naive().format("%Y-%m-%d").to_string(),
        );

        let payload = validate_at(&f, now).unwrap();
        let due = payload.due_date.unwrap();
        assert_eq!((due.hour(), due.minute()), (0, 0));
    }

    #[test]
    fn garbage_due_date_is_rejected() {
        let mut f = form("Ship report", "Work");
        f.due_date = Some("next tuesday".into());
        let err = validate(&f).unwrap_err();
        assert_eq!(err.field("dueDate"), Some("Invalid date format"));
    }

    #[test]
    fn empty_due_date_string_means_none() {
        let mut f = form("Ship report", "Work");
        f.due_date = Some(String::new());
        assert_eq!(validate(&f).unwrap().due_date, None);
    }

    #[test]
    fn tag_rules() {
        let mut f = form("Ship report", "Work");
        f.tags = (0..11).map(|i| format!("tag{i}")).collect();
        let err = validate(&f).unwrap_err();
        assert_eq!(err.field("tags"), Some("Maximum 10 tags allowed"));

        let mut f = form("Ship report", "Work");
        f.tags = vec!["t".repeat(31)];
        let err = validate(&f).unwrap_err();
        assert_eq!(err.field("tags"), Some("Tag must be less than 30 characters"));
    }

    #[test]
    fn errors_accumulate_across_fields() {
        let mut f = form("", "");
        f.due_date = Some("garbage".into());
        let err = validate(&f).unwrap_err();

        assert_eq!(err.errors.len(), 3);
        assert!(err.field("title").is_some());
        assert!(err.field("category").is_some());
        assert!(err.field("dueDate").is_some());
    }
}
