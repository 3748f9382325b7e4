//! Tasklist - deterministic task list core with defensive persistence
//!
//! The core of a single-user task list: a state-transition store over an
//! in-memory list of tasks, a pure view projection (filtering + counts),
//! and a storage adapter that persists the list as JSON and tolerates
//! missing, stale, or corrupt data.
//!
//! # Architecture
//!
//! ```text
//! host command
//!     └── Session::dispatch(Action)
//!             ├── store::apply          # the only mutation point
//!             ├── StorageAdapter::save  # best-effort, after the commit
//!             └── project::project      # pure derived view for rendering
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tasklist::{Action, MemoryStore, Session, StorageAdapter};
//!
//! let mut session = Session::open(StorageAdapter::new(Box::new(MemoryStore::new())));
//! session.dispatch(Action::Add { text: "Buy milk".into() });
//! assert_eq!(session.view().counts.total, 1);
//! ```

pub mod cli;
pub mod config;
pub mod id;
pub mod project;
pub mod session;
pub mod storage;
pub mod store;
pub mod task;

pub use id::{IdResolver, generate_id};
pub use project::{Counts, View, project, sort_newest_first};
pub use session::Session;
pub use storage::{DecodeReject, FileStore, KeyValue, MemoryStore, StorageAdapter, decode_task};
pub use store::{Action, apply};
pub use task::{FilterMode, Task, TaskList};

/// Maximum stored task text length (UTF-16 code units)
pub const MAX_TEXT_LEN: usize = 500;

/// Storage slot key holding the persisted task list
pub const TASKS_KEY: &str = "tasks";

/// Current Unix timestamp in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
