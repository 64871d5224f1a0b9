//! Dashboard statistics over a task collection.

use crate::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counts by status plus overdue. Cancelled tasks appear only in
/// `total` — and in `overdue` once past due, which follows the overdue
/// rule rather than the status buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
}

/// Aggregate counts at the current instant.
pub fn aggregate(tasks: &[Task]) -> TaskStats {
    aggregate_at(tasks, Utc::now())
}

/// Aggregate counts with an explicit clock.
pub fn aggregate_at(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Cancelled => {}
        }
        if task.is_overdue_at(now) {
            stats.overdue += 1;
        }
    }

    stats
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::Duration;
    use serde_json::Map;
    use uuid::Uuid;

    fn task(status: TaskStatus, due_date: Option<DateTime<Utc>>) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::now_v7(),
            title: "Fix the thing".into(),
            description: String::new(),
            status,
            priority: Priority::Medium,
            category: "Work".into(),
            due_date,
            created_at: now,
            updated_at: now,
            user_id: "auth0|alice".into(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn empty_collection() {
        assert_eq!(aggregate(&[]), TaskStats::default());
    }

    #[test]
    fn counts_by_status() {
        let tasks = vec![
            task(TaskStatus::Pending, None),
            task(TaskStatus::Pending, None),
            task(TaskStatus::InProgress, None),
            task(TaskStatus::Completed, None),
            task(TaskStatus::Cancelled, None),
        ];

        let stats = aggregate(&tasks);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        // cancelled only shows up in total
        assert_eq!(
            stats.pending + stats.in_progress + stats.completed,
            stats.total - 1
        );
    }

    #[test]
    fn overdue_excludes_completed_but_not_cancelled() {
        let now = Utc::now();
        let past = Some(now - Duration::days(1));

        let tasks = vec![
            task(TaskStatus::Pending, past),
            task(TaskStatus::InProgress, past),
            task(TaskStatus::Completed, past),
            task(TaskStatus::Cancelled, past),
        ];

        assert_eq!(aggregate_at(&tasks, now).overdue, 3);
    }

    #[test]
    fn future_due_dates_are_not_overdue() {
        let now = Utc::now();
        let tasks = vec![
            task(TaskStatus::Pending, Some(now + Duration::days(1))),
            task(TaskStatus::Pending, None),
        ];
        assert_eq!(aggregate_at(&tasks, now).overdue, 0);
    }
}
