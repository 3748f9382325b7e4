//! Task data model
//!
//! `Task` is the sole entity: user-supplied text plus a completion flag and
//! millisecond timestamps. `TaskList` is the aggregate the store transitions:
//! tasks in insertion order plus the active view filter.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::now_ms;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned at creation, immutable
    pub id: String,

    /// User-supplied text, trimmed and length-limited before storage
    pub text: String,

    /// Completion flag
    pub completed: bool,

    /// Creation timestamp (Unix milliseconds), immutable
    pub created_at: i64,

    /// Set whenever `completed` is toggled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Task {
    /// Create a new task from already-validated text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            completed: false,
            created_at: now_ms(),
            updated_at: None,
        }
    }

    /// Flip the completion flag, stamping `updated_at`
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.updated_at = Some(now_ms());
    }
}

/// Which tasks a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl FilterMode {
    /// Whether a task passes this filter
    pub fn accepts(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Aggregate state: tasks in insertion order plus the active filter.
///
/// Snapshots are immutable as far as the store is concerned: every
/// transition clones into a new `TaskList`, so in-flight readers keep a
/// consistent view of the prior one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    /// Tasks in insertion order, ids unique
    pub tasks: Vec<Task>,

    /// Active view filter
    pub filter: FilterMode,
}

impl TaskList {
    /// Whether a task with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Look up a task by id
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
