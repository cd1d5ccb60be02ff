//! Loading of `running_state_viz.json` trace documents.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TimelineError};
use crate::event::TraceEvent;

/// What to do when event timestamps are not non-decreasing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderPolicy {
    /// Hand the stream over as written
    #[default]
    Keep,
    /// Stable sort by timestamp
    Sort,
    /// Fail with [`TimelineError::OutOfOrder`]
    Reject,
}

/// A parsed trace document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn new(events: Vec<TraceEvent>) -> Self {
        Self { events }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a trace document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let log = Self::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), events = log.events.len(), "loaded trace");
        Ok(log)
    }

    /// First position whose timestamp is lower than its predecessor's.
    pub fn first_regression(&self) -> Option<usize> {
        self.events
            .windows(2)
            .position(|pair| pair[1].time_ms < pair[0].time_ms)
            .map(|i| i + 1)
    }

    pub fn is_time_ordered(&self) -> bool {
        self.first_regression().is_none()
    }

    /// Enforce `policy` on the event order.
    pub fn apply_order(mut self, policy: OrderPolicy) -> Result<Self> {
        let Some(position) = self.first_regression() else {
            return Ok(self);
        };
        match policy {
            OrderPolicy::Keep => {
                warn!(position, "trace timestamps are not ordered; keeping as written");
                Ok(self)
            }
            OrderPolicy::Sort => {
                debug!(position, "sorting out-of-order trace");
                self.events.sort_by_key(|e| e.time_ms);
                Ok(self)
            }
            OrderPolicy::Reject => Err(TimelineError::OutOfOrder {
                position,
                previous_ms: self.events[position - 1].time_ms,
                time_ms: self.events[position].time_ms,
            }),
        }
    }
}
