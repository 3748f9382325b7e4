//! Task store: the single place state transitions happen
//!
//! `apply` maps an action onto the current snapshot and returns the next
//! one. It is total: rejected inputs (blank text, unknown ids) return the
//! prior state unchanged instead of erroring.

use tracing::debug;

use crate::MAX_TEXT_LEN;
use crate::task::{FilterMode, Task, TaskList};

/// A state transition request
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the entire task list (hydration; elements must already have
    /// passed the storage boundary's validation)
    Load(Vec<Task>),
    /// Create a task from raw user text
    Add { text: String },
    /// Flip completion on the task with this id
    Toggle { id: String },
    /// Remove the task with this id
    Delete { id: String },
    /// Switch the active view filter
    SetFilter(FilterMode),
}

/// Apply an action to a snapshot, producing the next snapshot
pub fn apply(state: &TaskList, action: Action) -> TaskList {
    match action {
        Action::Load(tasks) => {
            debug!(count = tasks.len(), "load: replacing task list");
            TaskList {
                tasks,
                filter: state.filter,
            }
        }

        Action::Add { text } => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                debug!("add: blank text, state unchanged");
                return state.clone();
            }

            let task = Task::new(truncate_units(trimmed, MAX_TEXT_LEN));
            debug!(id = %task.id, "add: appending task");
            let mut next = state.clone();
            next.tasks.push(task);
            next
        }

        Action::Toggle { id } => {
            if !state.contains(&id) {
                debug!(%id, "toggle: unknown id, state unchanged");
                return state.clone();
            }

            debug!(%id, "toggle: flipping completion");
            let mut next = state.clone();
            for task in &mut next.tasks {
                if task.id == id {
                    task.toggle();
                }
            }
            next
        }

        Action::Delete { id } => {
            if !state.contains(&id) {
                debug!(%id, "delete: unknown id, state unchanged");
                return state.clone();
            }

            debug!(%id, "delete: removing task");
            let mut next = state.clone();
            next.tasks.retain(|t| t.id != id);
            next
        }

        Action::SetFilter(filter) => {
            debug!(%filter, "set_filter: switching view filter");
            let mut next = state.clone();
            next.filter = filter;
            next
        }
    }
}

/// Cut `text` to at most `limit` UTF-16 code units, never splitting a scalar
fn truncate_units(text: &str, limit: usize) -> String {
    let mut units = 0usize;
    let mut out = String::new();
    for c in text.chars() {
        units += c.len_utf16();
        if units > limit {
            break;
        }
        out.push(c);
    }
    out
}
