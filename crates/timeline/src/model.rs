//! The reconstructed timeline for one trace load.

use tracing::info;

use crate::config::TimelineConfig;
use crate::discovery::{TaskDescriptor, discover_tasks};
use crate::event::TraceEvent;
use crate::intervals::{ExecutionInterval, InitMarker, Reconstruction, reconstruct};
use crate::layout::{GridLine, TimelineLayout};
use crate::palette::FALLBACK_TASK_COLOR;
use crate::report::LayoutReport;
use crate::selection::TaskSelection;

/// Roster, intervals, init markers and layout derived from one trace.
///
/// Built in a single pass and never mutated afterwards. Loading another
/// trace means building a new model and swapping it in whole.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineModel {
    roster: Vec<TaskDescriptor>,
    reconstruction: Reconstruction,
    layout: TimelineLayout,
}

impl TimelineModel {
    pub fn build(events: &[TraceEvent], config: &TimelineConfig) -> Self {
        let roster = discover_tasks(events);
        let reconstruction = reconstruct(events, config.window_ms);
        let layout = TimelineLayout::for_events(events, roster.len(), config);

        info!(
            events = events.len(),
            tasks = roster.len(),
            intervals = reconstruction.interval_count(),
            t_max_ms = layout.t_max_ms(),
            "timeline reconstructed"
        );

        Self {
            roster,
            reconstruction,
            layout,
        }
    }

    /// Discovered tasks, sorted by declared index.
    pub fn roster(&self) -> &[TaskDescriptor] {
        &self.roster
    }

    pub fn task(&self, name: &str) -> Option<&TaskDescriptor> {
        self.roster.iter().find(|t| t.name == name)
    }

    /// Roster position of `name`.
    pub fn row_of(&self, name: &str) -> Option<usize> {
        self.roster.iter().position(|t| t.name == name)
    }

    /// Palette color for `name`, or the fallback color for tasks outside the roster.
    pub fn color_of(&self, name: &str) -> &'static str {
        self.task(name)
            .map(|t| t.display_color)
            .unwrap_or(FALLBACK_TASK_COLOR)
    }

    pub fn intervals(&self, task: &str) -> &[ExecutionInterval] {
        self.reconstruction.intervals(task)
    }

    pub fn init_marker(&self, task: &str) -> Option<&InitMarker> {
        self.reconstruction.init_marker(task)
    }

    pub fn reconstruction(&self) -> &Reconstruction {
        &self.reconstruction
    }

    pub fn layout(&self) -> &TimelineLayout {
        &self.layout
    }

    pub fn map_time(&self, time_ms: u64) -> f32 {
        self.layout.map_time(time_ms)
    }

    pub fn map_row(&self, roster_index: usize) -> f32 {
        self.layout.map_row(roster_index)
    }

    pub fn grid_lines(&self) -> Vec<GridLine> {
        self.layout.grid_lines()
    }

    /// Everything a renderer needs to paint the timeline, with rows dimmed
    /// according to `selection`.
    pub fn report(&self, selection: &TaskSelection) -> LayoutReport {
        LayoutReport::new(self, selection)
    }
}
