//! Task roster discovery from `task_discovered` events.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::event::{EventKind, TraceEvent};
use crate::palette::task_color;

// Matched separately so fragment order in the details string does not matter.
// ASCII digits only; `\d` would also match other Unicode decimal digits.
static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"period=([0-9]+)").unwrap());
static INDEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"index=([0-9]+)").unwrap());

/// One entry of the task roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskDescriptor {
    /// Task name, unique within a roster
    pub name: String,
    /// Declared scheduling period
    pub period_ms: u64,
    /// Declared ordering index
    pub index: u64,
    /// Palette color derived from `index`
    pub display_color: &'static str,
}

impl TaskDescriptor {
    pub fn new(name: impl Into<String>, period_ms: u64, index: u64) -> Self {
        Self {
            name: name.into(),
            period_ms,
            index,
            display_color: task_color(index),
        }
    }
}

/// Extract `(period_ms, index)` from a discovery details string.
///
/// Both fragments must be present and fit in a `u64`.
pub fn parse_discovery_details(details: &str) -> Option<(u64, u64)> {
    let period = capture_u64(&PERIOD_RE, details)?;
    let index = capture_u64(&INDEX_RE, details)?;
    Some((period, index))
}

fn capture_u64(re: &Regex, haystack: &str) -> Option<u64> {
    re.captures(haystack)?.get(1)?.as_str().parse().ok()
}

/// Build the roster from the full event stream, sorted by declared index.
///
/// A later discovery of the same name replaces the earlier entry outright
/// but keeps its slot in discovery order, which is what breaks index ties.
pub fn discover_tasks(events: &[TraceEvent]) -> Vec<TaskDescriptor> {
    let mut roster: Vec<TaskDescriptor> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for event in events {
        if event.kind != EventKind::TaskDiscovered {
            continue;
        }
        let Some(name) = event.task_name() else {
            continue;
        };
        let Some((period_ms, index)) = parse_discovery_details(event.details()) else {
            debug!(
                task = name,
                details = event.details(),
                time_ms = event.time_ms,
                "skipping discovery without period/index"
            );
            continue;
        };

        let descriptor = TaskDescriptor::new(name, period_ms, index);
        match slots.get(name) {
            Some(&slot) => roster[slot] = descriptor,
            None => {
                slots.insert(name.to_string(), roster.len());
                roster.push(descriptor);
            }
        }
    }

    // Stable, so equal indices stay in discovery order.
    roster.sort_by_key(|task| task.index);
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn discovered(time_ms: u64, task: &str, details: &str) -> TraceEvent {
        TraceEvent::new(time_ms, EventKind::TaskDiscovered)
            .with_task(task)
            .with_details(details)
    }

    #[test]
    fn test_only_ascii_digits_match() {
        // U+0663 is ARABIC-INDIC DIGIT THREE.
        assert_eq!(
            parse_discovery_details("period=\u{0663} index=1 period=5"),
            Some((5, 1))
        );
        assert_eq!(parse_discovery_details("period=\u{0663} index=1"), None);

        let roster = discover_tasks(&[discovered(0, "uart", "period=\u{0663} index=1 period=5")]);
        assert_eq!(roster, vec![TaskDescriptor::new("uart", 5, 1)]);
    }

    #[test]
    fn test_fragment_order_does_not_matter() {
        assert_eq!(parse_discovery_details("period=250 index=3"), Some((250, 3)));
        assert_eq!(parse_discovery_details("index=3 period=250"), Some((250, 3)));
        assert_eq!(
            parse_discovery_details("task registered: index=3, stack=2048, period=250"),
            Some((250, 3))
        );
    }

    #[test]
    fn test_missing_fragment_yields_nothing() {
        assert_eq!(parse_discovery_details("period=250"), None);
        assert_eq!(parse_discovery_details("index=1"), None);
        assert_eq!(parse_discovery_details("period= index=1"), None);
        assert_eq!(parse_discovery_details(""), None);
    }

    #[test]
    fn test_overflowing_value_yields_nothing() {
        assert_eq!(
            parse_discovery_details("period=99999999999999999999999 index=1"),
            None
        );
    }

    #[test]
    fn test_roster_sorted_by_index() {
        let events = vec![
            discovered(0, "radio", "period=500 index=2"),
            discovered(1, "blink", "period=1000 index=0"),
            discovered(2, "beacon", "period=30000 index=1"),
        ];

        let names: Vec<_> = discover_tasks(&events)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["blink", "beacon", "radio"]);
    }

    #[test]
    fn test_equal_indices_keep_discovery_order() {
        let events = vec![
            discovered(0, "zeta", "period=10 index=1"),
            discovered(1, "alpha", "period=10 index=1"),
            discovered(2, "mid", "period=10 index=0"),
        ];

        let roster = discover_tasks(&events);
        let names: Vec<_> = roster.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["mid", "zeta", "alpha"]);
        assert_eq!(roster[1].display_color, roster[2].display_color);
    }

    #[test]
    fn test_rediscovery_replaces_entry() {
        let events = vec![
            discovered(0, "TaskB", "period=100 index=4"),
            discovered(5, "TaskB", "period=250 index=1"),
        ];

        assert_eq!(
            discover_tasks(&events),
            vec![TaskDescriptor::new("TaskB", 250, 1)]
        );
    }

    #[test]
    fn test_malformed_rediscovery_keeps_previous_entry() {
        let events = vec![
            discovered(0, "TaskB", "period=100 index=4"),
            discovered(5, "TaskB", "period=250"),
        ];

        assert_eq!(
            discover_tasks(&events),
            vec![TaskDescriptor::new("TaskB", 100, 4)]
        );
    }

    #[test]
    fn test_nameless_and_other_events_ignored() {
        let events = vec![
            TraceEvent::new(0, EventKind::TaskDiscovered).with_details("period=1 index=1"),
            TraceEvent::new(1, EventKind::TaskStart)
                .with_task("x")
                .with_details("period=1 index=1"),
        ];
        assert!(discover_tasks(&events).is_empty());
    }

    #[test]
    fn test_empty_stream() {
        assert!(discover_tasks(&[]).is_empty());
    }
}
