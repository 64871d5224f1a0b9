//! Filtered, sorted views over a task collection.
//!
//! Pure functions: the input is never mutated and the result is a fresh
//! sequence, so a caller can re-derive its view after any store change.

use crate::task::{Priority, Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

// ── Filter specification ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Title,
    DueDate,
    CreatedAt,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// What to show and in which order. Empty predicate sets match
/// everything; the predicates that are set are conjunctive.
/// `sort_by: None` leaves the input order untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilter {
    pub status: Vec<TaskStatus>,
    pub priority: Vec<Priority>,
    pub category: Vec<String>,
    pub search_term: Option<String>,
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

// ── Apply ──────────────────────────────────────────────────────

/// Filter, then sort. The sort is stable, so equal keys keep their
/// original relative order, in both directions.
pub fn apply(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|t| matches(t, filter))
        .cloned()
        .collect();

    if let Some(key) = filter.sort_by {
        view.sort_by(|a, b| {
            let ord = compare(a, b, key);
            match filter.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    view
}

fn matches(task: &Task, filter: &TaskFilter) -> bool {
    if !filter.status.is_empty() && !filter.status.contains(&task.status) {
        return false;
    }
    if !filter.priority.is_empty() && !filter.priority.contains(&task.priority) {
        return false;
    }
    if !filter.category.is_empty() && !filter.category.contains(&task.category) {
        return false;
    }

    if let Some(term) = &filter.search_term {
        let term = term.trim().to_lowercase();
        // A blank search box filters nothing.
        if !term.is_empty() {
            let in_title = task.title.to_lowercase().contains(&term);
            let in_description = task.description.to_lowercase().contains(&term);
            let in_tags = task.tags.iter().any(|tag| tag.to_lowercase().contains(&term));
            if !in_title && !in_description && !in_tags {
                return false;
            }
        }
    }

    true
}

/// Missing due dates compare as the far future, so they land last when
/// ascending.
fn compare(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::DueDate => {
            let far = DateTime::<Utc>::MAX_UTC;
            a.due_date.unwrap_or(far).cmp(&b.due_date.unwrap_or(far))
        }
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Priority => a.priority.cmp(&b.priority),
    }
}

// ── Dropdown helpers ───────────────────────────────────────────

/// Every category in use, sorted and deduplicated.
pub fn unique_categories(tasks: &[Task]) -> Vec<String> {
    let set: BTreeSet<&str> = tasks.iter().map(|t| t.category.as_str()).collect();
    set.into_iter().map(String::from).collect()
}

/// Every tag in use, sorted and deduplicated.
pub fn unique_tags(tasks: &[Task]) -> Vec<String> {
    let set: BTreeSet<&str> = tasks
        .iter()
        .flat_map(|t| t.tags.iter().map(String::as_str))
        .collect();
    set.into_iter().map(String::from).collect()
}

// ── Tests ──────────────────────────────────────────────────────
