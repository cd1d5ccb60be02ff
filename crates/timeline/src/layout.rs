//! Timeline coordinate mapping: time to x, roster position to y.

use serde::Serialize;

use crate::config::TimelineConfig;
use crate::event::TraceEvent;
use crate::intervals::ExecutionInterval;

/// Width of the init marker drawn on a task row.
pub const INIT_MARKER_WIDTH_PX: f32 = 6.0;

/// Upper bound on grid lines; the step widens to a multiple of the
/// configured step past this.
pub const MAX_GRID_LINES: u64 = 1000;

/// A vertical grid line with its axis label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridLine {
    pub x: f32,
    pub time_ms: u64,
    pub label: String,
}

/// Horizontal placement of an execution span.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpanGeometry {
    pub x: f32,
    pub width: f32,
}

/// Horizontal placement of an init marker, centered on its timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MarkerGeometry {
    pub x: f32,
    pub width: f32,
}

/// Deterministic mapping from trace time and roster rows to pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineLayout {
    t_max_ms: u64,
    width_px: f32,
    row_height_px: f32,
    grid_step_ms: u64,
    min_span_width_px: f32,
    rows: usize,
}

impl TimelineLayout {
    /// Layout for a trace whose largest timestamp is `max_time_ms`.
    ///
    /// The domain end is floored at `config.time_floor_ms`.
    pub fn new(max_time_ms: u64, rows: usize, config: &TimelineConfig) -> Self {
        Self {
            t_max_ms: max_time_ms.max(config.time_floor_ms).max(1),
            width_px: config.width_px,
            row_height_px: config.row_height_px,
            grid_step_ms: config.grid_step_ms.max(1),
            min_span_width_px: config.min_span_width_px,
            rows,
        }
    }

    /// Layout spanning every timestamp in `events`.
    pub fn for_events(events: &[TraceEvent], rows: usize, config: &TimelineConfig) -> Self {
        let max_time_ms = events.iter().map(|e| e.time_ms).max().unwrap_or(0);
        Self::new(max_time_ms, rows, config)
    }

    /// End of the time domain; the domain always starts at zero.
    pub fn t_max_ms(&self) -> u64 {
        self.t_max_ms
    }

    pub fn width_px(&self) -> f32 {
        self.width_px
    }

    pub fn row_height_px(&self) -> f32 {
        self.row_height_px
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Horizontal offset of `time_ms`. Zero maps to 0 and `t_max_ms` maps
    /// to exactly `width_px`.
    pub fn map_time(&self, time_ms: u64) -> f32 {
        let fraction = (time_ms as f64 / self.t_max_ms as f64) as f32;
        fraction * self.width_px
    }

    /// Vertical offset of the roster entry at `roster_index`. Row 0 holds
    /// the axis, so the first task sits one row down.
    pub fn map_row(&self, roster_index: usize) -> f32 {
        (roster_index + 1) as f32 * self.row_height_px
    }

    /// Height covered by the axis row plus every task row.
    pub fn content_height(&self) -> f32 {
        self.map_row(self.rows)
    }

    /// Distance between grid lines: the configured step, widened by a whole
    /// factor when the domain would need more than [`MAX_GRID_LINES`].
    pub fn effective_grid_step_ms(&self) -> u64 {
        let needed = self.t_max_ms / self.grid_step_ms;
        if needed <= MAX_GRID_LINES {
            return self.grid_step_ms;
        }
        self.grid_step_ms
            .saturating_mul(needed.div_ceil(MAX_GRID_LINES))
    }

    /// Grid lines at every multiple of the grid step inside `[0, t_max_ms]`.
    pub fn grid_lines(&self) -> Vec<GridLine> {
        let step = usize::try_from(self.effective_grid_step_ms()).unwrap_or(usize::MAX);
        (0..=self.t_max_ms)
            .step_by(step)
            .map(|time_ms| GridLine {
                x: self.map_time(time_ms),
                time_ms,
                label: format!("{time_ms}ms"),
            })
            .collect()
    }

    /// On-screen width between two timestamps, never below the minimum span width.
    pub fn span_width(&self, start_ms: u64, end_ms: u64) -> f32 {
        (self.map_time(end_ms) - self.map_time(start_ms)).max(self.min_span_width_px)
    }

    pub fn span_geometry(&self, interval: &ExecutionInterval) -> SpanGeometry {
        SpanGeometry {
            x: self.map_time(interval.start_ms),
            width: self.span_width(interval.start_ms, interval.end_ms),
        }
    }

    pub fn marker_geometry(&self, time_ms: u64) -> MarkerGeometry {
        MarkerGeometry {
            x: self.map_time(time_ms) - INIT_MARKER_WIDTH_PX / 2.0,
            width: INIT_MARKER_WIDTH_PX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use pretty_assertions::assert_eq;

    fn layout(max_time_ms: u64) -> TimelineLayout {
        TimelineLayout::new(max_time_ms, 3, &TimelineConfig::default())
    }

    #[test]
    fn test_domain_is_floored() {
        assert_eq!(layout(0).t_max_ms(), 1000);
        assert_eq!(layout(400).t_max_ms(), 1000);
        assert_eq!(layout(4321).t_max_ms(), 4321);
    }

    #[test]
    fn test_map_time_endpoints() {
        for t_max in [1000, 1234, 7919, 86_400_000] {
            let l = layout(t_max);
            assert_eq!(l.map_time(0), 0.0);
            assert_eq!(l.map_time(t_max), 1200.0);
        }
    }

    #[test]
    fn test_map_time_monotonic() {
        let l = layout(7919);
        let mut previous = l.map_time(0);
        for t in 1..=7919 {
            let x = l.map_time(t);
            assert!(x >= previous, "x({t}) = {x} < {previous}");
            previous = x;
        }
    }

    #[test]
    fn test_map_time_midpoint() {
        assert_eq!(layout(2000).map_time(1000), 600.0);
    }

    #[test]
    fn test_map_row_reserves_axis_row() {
        let l = layout(1000);
        assert_eq!(l.map_row(0), 40.0);
        assert_eq!(l.map_row(2), 120.0);
        assert_eq!(l.content_height(), 160.0);
    }

    #[test]
    fn test_grid_lines_cover_domain() {
        let lines = layout(2500).grid_lines();
        let times: Vec<u64> = lines.iter().map(|g| g.time_ms).collect();
        assert_eq!(times, vec![0, 1000, 2000]);
        assert_eq!(lines[1].label, "1000ms");
        assert_eq!(lines[0].x, 0.0);
    }

    #[test]
    fn test_grid_line_on_domain_end() {
        let lines = layout(3000).grid_lines();
        let last = lines.last().unwrap();
        assert_eq!(last.time_ms, 3000);
        assert_eq!(last.x, 1200.0);
    }

    #[test]
    fn test_grid_lines_capped_for_epoch_timestamps() {
        let l = layout(1_000_000_000_000);
        assert_eq!(l.effective_grid_step_ms(), 1_000_000_000);
        let lines = l.grid_lines();
        assert_eq!(lines.len(), 1001);
        assert_eq!(lines[1].label, "1000000000ms");
        assert_eq!(lines.last().map(|g| g.x), Some(1200.0));
    }

    #[test]
    fn test_grid_step_widens_by_whole_factor() {
        assert_eq!(layout(1_000_000).effective_grid_step_ms(), 1000);
        assert_eq!(layout(1_000_000).grid_lines().len(), 1001);

        let l = layout(1_001_000);
        assert_eq!(l.effective_grid_step_ms(), 2000);
        assert_eq!(l.grid_lines().len(), 501);
        assert!(l.grid_lines().len() as u64 <= MAX_GRID_LINES + 1);
    }

    #[test]
    fn test_huge_grid_step() {
        let config = TimelineConfig {
            grid_step_ms: u64::MAX,
            ..TimelineConfig::default()
        };
        let lines = TimelineLayout::new(5000, 1, &config).grid_lines();
        let times: Vec<u64> = lines.iter().map(|g| g.time_ms).collect();
        assert_eq!(times, vec![0]);
    }

    #[test]
    fn test_span_width_floor() {
        let l = layout(100_000);
        assert_eq!(l.span_width(500, 500), 2.0);
        assert_eq!(l.span_width(500, 501), 2.0);
        assert!(l.span_width(0, 50_000) > 2.0);
    }

    #[test]
    fn test_span_geometry() {
        let l = layout(1000);
        let geometry = l.span_geometry(&ExecutionInterval {
            task_name: "A".into(),
            start_ms: 100,
            end_ms: 200,
        });
        assert_eq!(geometry.x, 120.0);
        assert!((geometry.width - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_marker_centered() {
        let marker = layout(1000).marker_geometry(500);
        assert_eq!(marker.x, 597.0);
        assert_eq!(marker.width, INIT_MARKER_WIDTH_PX);
    }

    #[test]
    fn test_for_events_uses_max_timestamp() {
        let events = vec![
            TraceEvent::new(1500, EventKind::TaskStart),
            TraceEvent::new(2500, EventKind::TaskEnd),
            TraceEvent::new(2000, EventKind::TaskLog),
        ];
        let l = TimelineLayout::for_events(&events, 0, &TimelineConfig::default());
        assert_eq!(l.t_max_ms(), 2500);
    }
}
