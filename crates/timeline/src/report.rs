//! Serializable snapshot of a laid-out timeline.

use serde::Serialize;

use crate::layout::{GridLine, MarkerGeometry, SpanGeometry};
use crate::model::TimelineModel;
use crate::selection::TaskSelection;

/// One roster row, fully positioned.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowReport {
    pub task: String,
    pub period_ms: u64,
    pub index: u64,
    pub color: &'static str,
    pub y: f32,
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_marker: Option<MarkerGeometry>,
    pub spans: Vec<SpanGeometry>,
}

/// Positioned rows and grid for a whole timeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutReport {
    pub t_max_ms: u64,
    pub width_px: f32,
    pub height_px: f32,
    pub grid: Vec<GridLine>,
    pub rows: Vec<RowReport>,
}

impl LayoutReport {
    pub fn new(model: &TimelineModel, selection: &TaskSelection) -> Self {
        let layout = model.layout();
        let rows = model
            .roster()
            .iter()
            .enumerate()
            .map(|(row, task)| RowReport {
                task: task.name.clone(),
                period_ms: task.period_ms,
                index: task.index,
                color: task.display_color,
                y: layout.map_row(row),
                opacity: selection.row_opacity(&task.name),
                init_marker: model
                    .init_marker(&task.name)
                    .map(|marker| layout.marker_geometry(marker.time_ms)),
                spans: model
                    .intervals(&task.name)
                    .iter()
                    .map(|interval| layout.span_geometry(interval))
                    .collect(),
            })
            .collect();

        Self {
            t_max_ms: layout.t_max_ms(),
            width_px: layout.width_px(),
            height_px: layout.content_height(),
            grid: layout.grid_lines(),
            rows,
        }
    }
}
