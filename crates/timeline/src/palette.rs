//! Colors assigned to tasks and event kinds.

use crate::event::EventKind;

/// Task colors, picked by `index % TASK_PALETTE.len()`.
pub const TASK_PALETTE: [&str; 10] = [
    "#ef4444", "#f59e0b", "#10b981", "#3b82f6", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
    "#06b6d4", "#84cc16",
];

/// Color for tasks that never made it into the roster.
pub const FALLBACK_TASK_COLOR: &str = "#999999";

/// Palette color for a declared task index. Tasks whose indices collide
/// modulo the palette size share a color.
pub fn task_color(index: u64) -> &'static str {
    TASK_PALETTE[(index % TASK_PALETTE.len() as u64) as usize]
}

/// Accent color for an event-log line.
pub fn event_color(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::TestStart => "#3b82f6",
        EventKind::TestPass => "#10b981",
        EventKind::TaskDiscovered => "#8b5cf6",
        EventKind::TaskInit => "#f59e0b",
        EventKind::TaskStart => "#10b981",
        EventKind::TaskEnd => "#6b7280",
        EventKind::TaskLog => "#06b6d4",
        EventKind::TaskDispatch => "#ef4444",
        EventKind::DispatchCycleStart => "#06b6d4",
        EventKind::DispatchCycleEnd => "#14b8a6",
        EventKind::Other(_) => "#6b7280",
    }
}
