//! Trace event vocabulary shared by every stage of reconstruction.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of a trace event.
///
/// The first four kinds drive reconstruction. The rest are emitted by the
/// scheduler for the event log only. Anything else is kept verbatim in
/// [`EventKind::Other`] so it survives a load/serialize cycle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A task announced itself, with `period=` and `index=` in its details
    TaskDiscovered,
    /// A task finished its init routine
    TaskInit,
    /// A task body began executing
    TaskStart,
    /// A task body returned
    TaskEnd,
    /// Free-form log line printed by a task
    TaskLog,
    /// The dispatcher picked a task to run
    TaskDispatch,
    /// A dispatch cycle began
    DispatchCycleStart,
    /// A dispatch cycle ended
    DispatchCycleEnd,
    /// A test case began
    TestStart,
    /// A test case passed
    TestPass,
    /// Unrecognized kind, preserved as written
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::TaskDiscovered => "task_discovered",
            Self::TaskInit => "task_init",
            Self::TaskStart => "task_start",
            Self::TaskEnd => "task_end",
            Self::TaskLog => "task_log",
            Self::TaskDispatch => "task_dispatch",
            Self::DispatchCycleStart => "dispatch_cycle_start",
            Self::DispatchCycleEnd => "dispatch_cycle_end",
            Self::TestStart => "test_start",
            Self::TestPass => "test_pass",
            Self::Other(raw) => raw,
        }
    }

    /// Whether reconstruction consumes this kind. Everything else only
    /// matters to the event log.
    pub fn is_reconstructed(&self) -> bool {
        matches!(
            self,
            Self::TaskDiscovered | Self::TaskInit | Self::TaskStart | Self::TaskEnd
        )
    }
}

impl From<&str> for EventKind {
    fn from(raw: &str) -> Self {
        match raw {
            "task_discovered" => Self::TaskDiscovered,
            "task_init" => Self::TaskInit,
            "task_start" => Self::TaskStart,
            "task_end" => Self::TaskEnd,
            "task_log" => Self::TaskLog,
            "task_dispatch" => Self::TaskDispatch,
            "dispatch_cycle_start" => Self::DispatchCycleStart,
            "dispatch_cycle_end" => Self::DispatchCycleEnd,
            "test_start" => Self::TestStart,
            "test_pass" => Self::TestPass,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        match Self::from(raw.as_str()) {
            Self::Other(_) => Self::Other(raw),
            known => known,
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Milliseconds since the scheduler booted
    pub time_ms: u64,

    /// Event kind, serialized under the wire name `event`
    #[serde(rename = "event")]
    pub kind: EventKind,

    /// Owning task. Absent for stream-scoped events like dispatch cycles.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub task: Option<String>,

    /// Free-text payload
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<String>,
}

impl TraceEvent {
    pub fn new(time_ms: u64, kind: impl Into<EventKind>) -> Self {
        Self {
            time_ms,
            kind: kind.into(),
            task: None,
            details: None,
        }
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into()).filter(|t: &String| !t.is_empty());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into()).filter(|d: &String| !d.is_empty());
        self
    }

    /// Task name, if present and non-empty.
    pub fn task_name(&self) -> Option<&str> {
        self.task.as_deref().filter(|t| !t.is_empty())
    }

    /// Details payload, or the empty string.
    pub fn details(&self) -> &str {
        self.details.as_deref().unwrap_or_default()
    }

    /// True when this event is bound to `task`.
    pub fn is_for(&self, task: &str) -> bool {
        self.task_name() == Some(task)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}
