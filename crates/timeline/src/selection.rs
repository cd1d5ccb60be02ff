//! Task visibility owned by the caller, and the event-log filter built on it.

use std::collections::BTreeSet;

use crate::discovery::TaskDescriptor;
use crate::event::{EventKind, TraceEvent};

/// Opacity of a selected task row.
pub const SELECTED_OPACITY: f32 = 1.0;
/// Opacity of a deselected task row. Rows are dimmed, never removed.
pub const DIMMED_OPACITY: f32 = 0.2;

/// Set of task names the viewer currently shows.
///
/// The timeline only ever reads this; toggling is up to whoever owns it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskSelection {
    selected: BTreeSet<String>,
}

impl TaskSelection {
    /// Selection with nothing selected.
    pub fn none() -> Self {
        Self::default()
    }

    /// Initial state after a load: every roster task selected.
    pub fn all(roster: &[TaskDescriptor]) -> Self {
        Self {
            selected: roster.iter().map(|t| t.name.clone()).collect(),
        }
    }

    pub fn is_selected(&self, task: &str) -> bool {
        self.selected.contains(task)
    }

    pub fn select(&mut self, task: impl Into<String>) {
        self.selected.insert(task.into());
    }

    pub fn deselect(&mut self, task: &str) {
        self.selected.remove(task);
    }

    /// Flip `task` and return whether it is now selected.
    pub fn toggle(&mut self, task: &str) -> bool {
        if self.selected.remove(task) {
            false
        } else {
            self.selected.insert(task.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn row_opacity(&self, task: &str) -> f32 {
        if self.is_selected(task) {
            SELECTED_OPACITY
        } else {
            DIMMED_OPACITY
        }
    }
}

/// Options for the event log view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventLogFilter {
    /// Show `task_log` lines
    pub show_task_logs: bool,
}

impl Default for EventLogFilter {
    fn default() -> Self {
        Self {
            show_task_logs: true,
        }
    }
}

/// Events the log should list, in stream order.
///
/// Events bound to a deselected task are hidden. Stream-scoped events,
/// those without a task, always pass.
pub fn filter_event_log<'a>(
    events: &'a [TraceEvent],
    selection: &'a TaskSelection,
    filter: EventLogFilter,
) -> impl Iterator<Item = &'a TraceEvent> + 'a {
    let show_task_logs = filter.show_task_logs;
    events.iter().filter(move |event| match event.task_name() {
        Some(task) if !selection.is_selected(task) => false,
        _ => show_task_logs || event.kind != EventKind::TaskLog,
    })
}
