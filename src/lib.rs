//! Task data engine for a personal task tracker.
//!
//! The in-memory store is the session's source of truth; a storage slot
//! holds the persisted JSON blob. A presentation layer drives the store
//! and renders its views — this crate has no UI, no server, no runtime.
//!
//! ```
//! use taskdeck_engine::{Identity, MemoryStorage, SaveSlot, TaskStore};
//! use taskdeck_engine::validate::{validate, TaskForm};
//!
//! let mut store = TaskStore::new(SaveSlot::new(MemoryStorage::new()));
//! let me = Identity {
//!     id: "auth0|demo".into(),
//!     email: "demo@example.com".into(),
//!     name: "Demo".into(),
//!     picture: None,
//!     email_verified: true,
//! };
//!
//! let payload = validate(&TaskForm {
//!     title: "Ship report".into(),
//!     category: "Work".into(),
//!     ..TaskForm::default()
//! })
//! .unwrap();
//!
//! store.create(Some(&me), payload).unwrap();
//! assert_eq!(store.stats(Some(&me)).pending, 1);
//! ```

pub mod filter;
pub mod identity;
pub mod persist;
pub mod stats;
pub mod store;
pub mod task;
pub mod validate;

pub use filter::{unique_categories, unique_tags, SortKey, SortOrder, TaskFilter};
pub use identity::{FixedIdentity, Identity, IdentityProvider};
pub use persist::{MemoryStorage, RedbStorage, SaveSlot, Storage, StorageError, TASKS_SLOT};
pub use stats::{aggregate, aggregate_at, TaskStats};
pub use store::{StoreError, TaskPatch, TaskStore};
pub use task::{format_due_date, Priority, Task, TaskStatus};
pub use validate::{validate, validate_at, FieldError, TaskForm, TaskPayload, ValidationErrors};
