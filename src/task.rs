use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ── Entity types ──────────────────────────────────────────────

/// Task status. No transition table is enforced: any status may replace
/// any other, so completed and cancelled tasks can be reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Priority, totally ordered Low < Medium < High < Urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A task — one user-owned unit of work.
///
/// `id`, `created_at`, and `user_id` never change after creation. A due
/// date in the past is still valid: the task is overdue, not broken.
///
/// Field names serialize camelCase to match the persisted record layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Minted at creation from a timestamp plus random bits (UUID v7).
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Opaque foreign key to the identity that created the task.
    pub user_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stored-record fields this crate doesn't model. Carried through a
    /// load/save round trip unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Overdue = has a due date in the past and isn't completed.
    /// Cancelled tasks past their due date still count.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => self.status != TaskStatus::Completed && due < now,
            None => false,
        }
    }
}

/// Human label for a due date: "No due date", "Today", "Overdue (Feb 11)",
/// or "Feb 11, 2026".
pub fn format_due_date(due_date: Option<DateTime<Utc>>) -> String {
    let Some(due) = due_date else {
        return "No due date".to_string();
    };

    let now = Utc::now();
    if due.date_naive() == now.date_naive() {
        return "Today".to_string();
    }
    if due < now {
        return format!("Overdue ({})", due.format("%b %d"));
    }
    due.format("%b %d, %Y").to_string()
}

// ── Tests ──────────────────────────────────────────────────────
