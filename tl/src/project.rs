//! View projection: pure derived data for presentation
//!
//! Nothing here mutates state or touches storage; `project` recomputes the
//! visible list and summary counts from a snapshot on every call.

use serde::Serialize;

use crate::task::{Task, TaskList};

/// Summary counts over the unfiltered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Derived view of a snapshot: what presentation renders
#[derive(Debug, Clone, Serialize)]
pub struct View {
    /// Tasks passing the active filter, insertion order preserved
    pub visible_tasks: Vec<Task>,

    /// Counts over the unfiltered list
    pub counts: Counts,
}

/// Project a snapshot into its visible tasks and summary counts
pub fn project(state: &TaskList) -> View {
    let total = state.tasks.len();
    let completed = state.tasks.iter().filter(|t| t.completed).count();
    let counts = Counts {
        total,
        active: total - completed,
        completed,
    };

    let visible_tasks = state
        .tasks
        .iter()
        .filter(|t| state.filter.accepts(t))
        .cloned()
        .collect();

    View { visible_tasks, counts }
}

/// Order tasks newest-first by creation time.
///
/// Stable: tasks sharing a `created_at` keep their relative (insertion)
/// order. Applied only when the host asks for it; `project` itself never
/// reorders.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| std::cmp::Reverse(t.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Action, apply};
    use crate::task::FilterMode;

    fn sample_state() -> TaskList {
        let mut state = TaskList::default();
        for text in ["one", "two", "three"] {
            state = apply(&state, Action::Add { text: text.to_string() });
        }
        // complete the middle task
        let id = state.tasks[1].id.clone();
        apply(&state, Action::Toggle { id })
    }

    #[test]
    fn test_counts_add_up() {
        let view = project(&sample_state());
        assert_eq!(view.counts.total, 3);
        assert_eq!(view.counts.active, 2);
        assert_eq!(view.counts.completed, 1);
        assert_eq!(view.counts.active + view.counts.completed, view.counts.total);
    }

    #[test]
    fn test_filter_all_shows_everything() {
        let view = project(&sample_state());
        assert_eq!(view.visible_tasks.len(), view.counts.total);
    }

    #[test]
    fn test_filter_active_hides_completed() {
        let state = apply(&sample_state(), Action::SetFilter(FilterMode::Active));
        let view = project(&state);
        assert_eq!(view.visible_tasks.len(), view.counts.active);
        assert!(view.visible_tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_filter_completed_shows_only_completed() {
        let state = apply(&sample_state(), Action::SetFilter(FilterMode::Completed));
        let view = project(&state);
        assert_eq!(view.visible_tasks.len(), view.counts.completed);
        assert!(view.visible_tasks.iter().all(|t| t.completed));
    }

    #[test]
    fn test_counts_ignore_active_filter() {
        let state = apply(&sample_state(), Action::SetFilter(FilterMode::Completed));
        let view = project(&state);
        // counts always cover the unfiltered list
        assert_eq!(view.counts.total, 3);
    }

    #[test]
    fn test_projection_preserves_insertion_order() {
        let state = apply(&sample_state(), Action::SetFilter(FilterMode::Active));
        let view = project(&state);
        let texts: Vec<&str> = view.visible_tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "three"]);
    }

    #[test]
    fn test_empty_state_projects_empty() {
        let view = project(&TaskList::default());
        assert!(view.visible_tasks.is_empty());
        assert_eq!(view.counts, Counts::default());
    }

    #[test]
    fn test_sort_newest_first_is_stable() {
        let mut tasks = vec![
            Task { id: "task-1".into(), text: "a".into(), completed: false, created_at: 100, updated_at: None },
            Task { id: "task-2".into(), text: "b".into(), completed: false, created_at: 200, updated_at: None },
            Task { id: "task-3".into(), text: "c".into(), completed: false, created_at: 200, updated_at: None },
            Task { id: "task-4".into(), text: "d".into(), completed: false, created_at: 50, updated_at: None },
        ];

        sort_newest_first(&mut tasks);

        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        // ties (task-2, task-3) keep insertion order
        assert_eq!(ids, vec!["task-2", "task-3", "task-1", "task-4"]);
    }
}
