//! Pairing of `task_start`/`task_end` events into execution intervals.
//!
//! For every start at `s`, the first later end of the same task with a
//! timestamp in `[s, s + window]` closes the interval. Starts with no such
//! end are dropped. Matching does not consume the end event, so one end can
//! close several starts that all reach it within their windows.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::event::{EventKind, TraceEvent};

/// A reconstructed span during which a task was running.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExecutionInterval {
    pub task_name: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl ExecutionInterval {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Point in time at which a task reported its init.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InitMarker {
    pub task_name: String,
    pub time_ms: u64,
}

/// Intervals and init markers for every task seen in a trace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Reconstruction {
    intervals: BTreeMap<String, Vec<ExecutionInterval>>,
    init_markers: BTreeMap<String, InitMarker>,
}

impl Reconstruction {
    /// Intervals for `task` in start order. Empty when none were paired.
    pub fn intervals(&self, task: &str) -> &[ExecutionInterval] {
        self.intervals.get(task).map(Vec::as_slice).unwrap_or_default()
    }

    /// Last init marker reported by `task`.
    pub fn init_marker(&self, task: &str) -> Option<&InitMarker> {
        self.init_markers.get(task)
    }

    /// Every task that produced at least one interval or init marker.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self
            .intervals
            .keys()
            .chain(self.init_markers.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty() && self.init_markers.is_empty()
    }
}

/// Lifecycle events of one task, in stream order.
#[derive(Default)]
struct TaskBucket<'a> {
    starts: Vec<(usize, u64)>,
    ends: Vec<(usize, u64)>,
    init: Option<u64>,
    name: &'a str,
}

/// Reconstruct intervals and init markers from the whole event stream.
pub fn reconstruct(events: &[TraceEvent], window_ms: u64) -> Reconstruction {
    let buckets = bucket_by_task(events);
    let paired = pair_buckets(&buckets, window_ms);

    let mut reconstruction = Reconstruction::default();
    for (bucket, intervals) in buckets.values().zip(paired) {
        if let Some(time_ms) = bucket.init {
            reconstruction.init_markers.insert(
                bucket.name.to_string(),
                InitMarker {
                    task_name: bucket.name.to_string(),
                    time_ms,
                },
            );
        }
        if !intervals.is_empty() {
            reconstruction
                .intervals
                .insert(bucket.name.to_string(), intervals);
        }
    }
    reconstruction
}

fn bucket_by_task(events: &[TraceEvent]) -> BTreeMap<&str, TaskBucket<'_>> {
    let mut buckets: BTreeMap<&str, TaskBucket<'_>> = BTreeMap::new();

    for (position, event) in events.iter().enumerate() {
        if !matches!(
            event.kind,
            EventKind::TaskInit | EventKind::TaskStart | EventKind::TaskEnd
        ) {
            continue;
        }
        let Some(name) = event.task_name() else {
            continue;
        };
        let bucket = buckets.entry(name).or_insert_with(|| TaskBucket {
            name,
            ..TaskBucket::default()
        });
        match event.kind {
            EventKind::TaskInit => bucket.init = Some(event.time_ms),
            EventKind::TaskStart => bucket.starts.push((position, event.time_ms)),
            EventKind::TaskEnd => bucket.ends.push((position, event.time_ms)),
            _ => {}
        }
    }
    buckets
}

#[cfg(not(feature = "parallel"))]
fn pair_buckets(
    buckets: &BTreeMap<&str, TaskBucket<'_>>,
    window_ms: u64,
) -> Vec<Vec<ExecutionInterval>> {
    buckets
        .values()
        .map(|bucket| pair_task(bucket, window_ms))
        .collect()
}

#[cfg(feature = "parallel")]
fn pair_buckets(
    buckets: &BTreeMap<&str, TaskBucket<'_>>,
    window_ms: u64,
) -> Vec<Vec<ExecutionInterval>> {
    use rayon::prelude::*;

    let buckets: Vec<&TaskBucket<'_>> = buckets.values().collect();
    buckets
        .par_iter()
        .map(|bucket| pair_task(bucket, window_ms))
        .collect()
}

fn pair_task(bucket: &TaskBucket<'_>, window_ms: u64) -> Vec<ExecutionInterval> {
    let mut intervals = Vec::new();

    for &(start_pos, start_ms) in &bucket.starts {
        let limit = start_ms.saturating_add(window_ms);
        // Ends are in stream order, so skip the ones before this start.
        let first_later = bucket.ends.partition_point(|&(pos, _)| pos < start_pos);
        let matched = bucket.ends[first_later..]
            .iter()
            .find(|&&(_, end_ms)| start_ms <= end_ms && end_ms <= limit);

        match matched {
            Some(&(_, end_ms)) => intervals.push(ExecutionInterval {
                task_name: bucket.name.to_string(),
                start_ms,
                end_ms,
            }),
            None => trace!(
                task = bucket.name,
                start_ms,
                window_ms,
                "dropping start with no end inside the window"
            ),
        }
    }
    intervals
}
