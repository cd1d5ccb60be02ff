//! Task execution timelines from scheduler running-state traces.
//!
//! A trace is an ordered list of timestamped lifecycle events. From it this
//! crate derives:
//! - the task roster, from `task_discovered` events carrying `period=` and `index=`
//! - execution intervals, by pairing each `task_start` with the first later
//!   `task_end` of the same task inside a tolerance window
//! - one init marker per task, from the last `task_init`
//! - a layout mapping time and roster rows to pixels
//!
//! # Quick Start
//!
//! ```rust
//! use timeline::{EventKind, TaskSelection, TimelineConfig, TimelineModel, TraceEvent};
//!
//! let events = vec![
//!     TraceEvent::new(0, EventKind::TaskDiscovered)
//!         .with_task("TaskA")
//!         .with_details("period=100 index=0"),
//!     TraceEvent::new(10, EventKind::TaskStart).with_task("TaskA"),
//!     TraceEvent::new(40, EventKind::TaskEnd).with_task("TaskA"),
//! ];
//!
//! let model = TimelineModel::build(&events, &TimelineConfig::default());
//! assert_eq!(model.roster()[0].period_ms, 100);
//! assert_eq!(model.intervals("TaskA")[0].end_ms, 40);
//!
//! let report = model.report(&TaskSelection::all(model.roster()));
//! assert_eq!(report.rows.len(), 1);
//! ```
//!
//! Reconstruction never fails. Malformed discoveries and unmatched starts
//! are simply absent from the output.

pub mod config;
pub mod discovery;
pub mod error;
pub mod event;
pub mod intervals;
pub mod layout;
pub mod loader;
pub mod model;
pub mod palette;
pub mod report;
pub mod selection;

pub use config::TimelineConfig;
pub use discovery::{TaskDescriptor, discover_tasks, parse_discovery_details};
pub use error::{Result, TimelineError};
pub use event::{EventKind, TraceEvent};
pub use intervals::{ExecutionInterval, InitMarker, Reconstruction, reconstruct};
pub use layout::{GridLine, MAX_GRID_LINES, MarkerGeometry, SpanGeometry, TimelineLayout};
pub use loader::{OrderPolicy, TraceLog};
pub use model::TimelineModel;
pub use report::{LayoutReport, RowReport};
pub use selection::{EventLogFilter, TaskSelection, filter_event_log};
