//! The task store — canonical in-memory collection for the session.
//!
//! Loaded from the save slot on refresh, mutated in place, rewritten to
//! the slot after every mutation. The slot write is best-effort: on
//! failure the session keeps running against memory and the loss is
//! only durability.
//!
//! Every mutation requires a signed-in identity and passes the
//! ownership guard: a task is only visible and mutable through the
//! identity that created it. A guard miss is a silent no-op, not an
//! error — the store reports nothing about other users' tasks.

use crate::filter::{self, SortKey, SortOrder, TaskFilter};
use crate::identity::Identity;
use crate::persist::{SaveSlot, Storage};
use crate::stats::{self, TaskStats};
use crate::task::{Priority, Task, TaskStatus};
use crate::validate::TaskPayload;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Map;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// create/update/delete called with no signed-in identity.
    #[error("authentication required")]
    AuthenticationRequired,
}

// ── Patch ──────────────────────────────────────────────────────

/// Partial update for an existing task. Absent fields keep their
/// current value. An absent due date keeps the old one, so an update
/// cannot clear a due date.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    /// Patch that only changes the status (the card's quick action).
    pub fn status(status: TaskStatus) -> Self {
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        }
    }
}

impl From<TaskPayload> for TaskPatch {
    /// The edit form validates the full payload, then submits it as an
    /// update. Every field is provided except a missing due date, which
    /// keeps the task's existing one.
    fn from(payload: TaskPayload) -> Self {
        TaskPatch {
            title: Some(payload.title),
            description: Some(payload.description),
            status: Some(payload.status),
            priority: Some(payload.priority),
            category: Some(payload.category),
            due_date: payload.due_date,
            tags: Some(payload.tags),
        }
    }
}

// ── The store ──────────────────────────────────────────────────

pub struct TaskStore<S: Storage> {
    tasks: Vec<Task>,
    slot: SaveSlot<S>,
    filter: TaskFilter,
    revision: u64,
}

impl<S: Storage> TaskStore<S> {
    /// A fresh store over the given slot. Starts empty; call `refresh`
    /// once an identity is known. The initial view sorts newest first.
    pub fn new(slot: SaveSlot<S>) -> Self {
        TaskStore {
            tasks: Vec::new(),
            slot,
            filter: TaskFilter {
                sort_by: Some(SortKey::CreatedAt),
                sort_order: SortOrder::Desc,
                ..TaskFilter::default()
            },
            revision: 0,
        }
    }

    /// Create a task owned by the signed-in user and hand it back.
    pub fn create(
        &mut self,
        identity: Option<&Identity>,
        payload: TaskPayload,
    ) -> Result<Task, StoreError> {
        let identity = identity.ok_or(StoreError::AuthenticationRequired)?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::now_v7(),
            title: payload.title,
            description: payload.description,
            status: payload.status,
            priority: payload.priority,
            category: payload.category,
            due_date: payload.due_date,
            created_at: now,
            updated_at: now,
            user_id: identity.id.clone(),
            tags: payload.tags,
            extra: Map::new(),
        };

        self.tasks.push(task.clone());
        self.committed();
        Ok(task)
    }

    /// Merge a patch into an owned task and stamp `updated_at`.
    /// Unknown id, or a task owned by someone else: silent no-op.
    pub fn update(
        &mut self,
        identity: Option<&Identity>,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<(), StoreError> {
        let identity = identity.ok_or(StoreError::AuthenticationRequired)?;

        let Some(task) = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == identity.id)
        else {
            return Ok(());
        };

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(due) = patch.due_date {
            task.due_date = Some(due);
        }
        if let Some(tags) = patch.tags {
            task.tags = tags;
        }
        task.updated_at = Utc::now();

        self.committed();
        Ok(())
    }

    /// Remove an owned task. Same silent guard as update.
    pub fn delete(&mut self, identity: Option<&Identity>, id: Uuid) -> Result<(), StoreError> {
        let identity = identity.ok_or(StoreError::AuthenticationRequired)?;

        let before = self.tasks.len();
        self.tasks
            .retain(|t| !(t.id == id && t.user_id == identity.id));

        if self.tasks.len() != before {
            self.committed();
        }
        Ok(())
    }

    /// All tasks owned by the signed-in user; empty when signed out.
    pub fn list(&self, identity: Option<&Identity>) -> Vec<&Task> {
        match identity {
            Some(identity) => self
                .tasks
                .iter()
                .filter(|t| t.user_id == identity.id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Re-read the slot and swap in the user's subset — recovers from
    /// external slot changes. Signed out, the working set empties.
    pub fn refresh(&mut self, identity: Option<&Identity>) {
        match identity {
            Some(identity) => {
                let stored = self.slot.load();
                self.tasks = stored
                    .into_iter()
                    .filter(|t| t.user_id == identity.id)
                    .collect();
            }
            None => self.tasks.clear(),
        }
        self.revision += 1;
    }

    // ── Derived state ──────────────────────────────────────────

    /// The user's tasks through the active filter and sort.
    pub fn view(&self, identity: Option<&Identity>) -> Vec<Task> {
        let tasks: Vec<Task> = self.list(identity).into_iter().cloned().collect();
        filter::apply(&tasks, &self.filter)
    }

    /// Dashboard counts over the user's tasks, unfiltered.
    pub fn stats(&self, identity: Option<&Identity>) -> TaskStats {
        let tasks: Vec<Task> = self.list(identity).into_iter().cloned().collect();
        stats::aggregate(&tasks)
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Replace the whole filter specification.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// Partial change: tweak the current filter in place, leaving the
    /// untouched fields as they were.
    pub fn update_filter(&mut self, change: impl FnOnce(&mut TaskFilter)) {
        change(&mut self.filter);
    }

    /// Bumped on every state change. A cheap dirty check so a caller
    /// can re-render only when something happened.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record a mutation: bump revision, then best-effort save of the
    /// full collection. A failed save is logged and absorbed.
    fn committed(&mut self) {
        self.revision += 1;
        if let Err(e) = self.slot.save(&self.tasks) {
            warn!("task save failed: {e}");
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
