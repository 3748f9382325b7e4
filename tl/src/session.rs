//! Session: the dispatch entry point the presentation layer talks to
//!
//! Owns the current snapshot and the storage adapter. Every dispatched
//! action commits a new snapshot first; persistence is an unconditional
//! best-effort side effect after the commit and never gates it.

use tracing::debug;

use crate::project::{self, View};
use crate::storage::StorageAdapter;
use crate::store::{self, Action};
use crate::task::TaskList;

pub struct Session {
    state: TaskList,
    storage: StorageAdapter,
}

impl Session {
    /// Open a session, hydrating from persisted storage
    pub fn open(storage: StorageAdapter) -> Self {
        let tasks = storage.load();
        let state = store::apply(&TaskList::default(), Action::Load(tasks));
        debug!(count = state.tasks.len(), "session hydrated");
        Self { state, storage }
    }

    /// Apply an action, commit the new snapshot, then best-effort persist
    pub fn dispatch(&mut self, action: Action) -> &TaskList {
        self.state = store::apply(&self.state, action);
        self.storage.save(&self.state.tasks);
        &self.state
    }

    /// Current snapshot
    pub fn state(&self) -> &TaskList {
        &self.state
    }

    /// Projected view of the current snapshot
    pub fn view(&self) -> View {
        project::project(&self.state)
    }
}
