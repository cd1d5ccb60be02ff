//! Command-line front end: load a trace, reconstruct it, print the result.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use timeline::{
    EventKind, EventLogFilter, LayoutReport, OrderPolicy, TaskDescriptor, TaskSelection, TimelineConfig,
    TimelineModel, TraceEvent, TraceLog, filter_event_log,
};
use tracing::{debug, info};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "timeline",
    about = "Reconstruct task execution timelines from running-state traces",
    version
)]
pub struct Cli {
    /// Trace document (running_state_viz.json)
    pub trace: PathBuf,

    /// TOML file with layout and pairing settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Width of the time axis in pixels
    #[arg(long)]
    pub width: Option<f32>,

    /// Start/end pairing window in milliseconds
    #[arg(long)]
    pub window: Option<u64>,

    /// How to handle timestamps that go backwards
    #[arg(long, value_enum, default_value_t = OrderArg::Keep)]
    pub order: OrderArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Dim a task (repeatable)
    #[arg(long = "hide", value_name = "TASK")]
    pub hidden: Vec<String>,

    /// Include the filtered event log
    #[arg(long)]
    pub events: bool,

    /// Leave task_log lines out of the event log
    #[arg(long)]
    pub no_task_logs: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Keep,
    Sort,
    Reject,
}

impl From<OrderArg> for OrderPolicy {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Keep => OrderPolicy::Keep,
            OrderArg::Sort => OrderPolicy::Sort,
            OrderArg::Reject => OrderPolicy::Reject,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// JSON document written with `--format json`.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub roster: &'a [TaskDescriptor],
    pub layout: LayoutReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<&'a TraceEvent>>,
}

/// Settings from `--config`, with command-line flags applied on top.
pub fn resolve_config(cli: &Cli) -> Result<TimelineConfig> {
    let mut config = match &cli.config {
        Some(path) => TimelineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TimelineConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width_px = width;
    }
    if let Some(window) = cli.window {
        config.window_ms = window;
    }
    config.validate().context("invalid settings")?;
    Ok(config)
}

/// Run the tool, writing its output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = resolve_config(cli)?;
    debug!(?config, "resolved settings");

    let log = TraceLog::load(&cli.trace)
        .with_context(|| format!("failed to read trace {}", cli.trace.display()))?
        .apply_order(cli.order.into())
        .context("trace rejected")?;

    let model = TimelineModel::build(&log.events, &config);

    let mut selection = TaskSelection::all(model.roster());
    for task in &cli.hidden {
        selection.deselect(task);
    }
    let filter = EventLogFilter {
        show_task_logs: !cli.no_task_logs,
    };

    match cli.format {
        OutputFormat::Text => {
            let mut text = render_text(&model, &selection);
            if cli.events {
                text.push_str(&render_event_log(&log.events, &selection, filter));
            }
            out.write_all(text.as_bytes())?;
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                roster: model.roster(),
                layout: model.report(&selection),
                events: cli
                    .events
                    .then(|| filter_event_log(&log.events, &selection, filter).collect()),
            };
            serde_json::to_writer_pretty(&mut *out, &output)?;
            out.write_all(b"\n")?;
        }
    }

    info!(
        trace = %cli.trace.display(),
        tasks = model.roster().len(),
        "timeline written"
    );
    Ok(())
}

/// Plain-text summary of roster, intervals and grid.
pub fn render_text(model: &TimelineModel, selection: &TaskSelection) -> String {
    let mut text = String::new();
    let layout = model.layout();

    let _ = writeln!(text, "Tasks ({})", model.roster().len());
    for (row, task) in model.roster().iter().enumerate() {
        let mark = if selection.is_selected(&task.name) { "x" } else { " " };
        let init = model
            .init_marker(&task.name)
            .map(|m| format!("{}ms", m.time_ms))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            text,
            "  [{mark}] {:<16} period {:>6}ms  index {:>3}  {}  y={:.0}  init {}  runs {}",
            task.name,
            task.period_ms,
            task.index,
            task.display_color,
            layout.map_row(row),
            init,
            model.intervals(&task.name).len(),
        );
    }

    let _ = writeln!(text, "Intervals");
    for task in model.roster() {
        if !selection.is_selected(&task.name) {
            continue;
        }
        for interval in model.intervals(&task.name) {
            let geometry = layout.span_geometry(interval);
            let _ = writeln!(
                text,
                "  {:<16} {:>8}ms -> {:>8}ms ({}ms)  x={:.1} w={:.1}",
                task.name,
                interval.start_ms,
                interval.end_ms,
                interval.duration_ms(),
                geometry.x,
                geometry.width,
            );
        }
    }

    let grid: Vec<String> = model
        .grid_lines()
        .iter()
        .map(|line| format!("{}@{:.1}", line.label, line.x))
        .collect();
    let _ = writeln!(
        text,
        "Grid (0..{}ms over {}px): {}",
        layout.t_max_ms(),
        layout.width_px(),
        grid.join(" ")
    );
    text
}

/// Event log lines for the selected tasks.
pub fn render_event_log(
    events: &[TraceEvent],
    selection: &TaskSelection,
    filter: EventLogFilter,
) -> String {
    let mut text = String::from("Events\n");
    for event in filter_event_log(events, selection, filter) {
        let task = event.task_name().unwrap_or_default();
        let _ = if event.kind == EventKind::TaskLog {
            writeln!(text, "  [{}ms]     {task}: {}", event.time_ms, event.details())
        } else {
            let mut line = format!("  [{}ms] {}", event.time_ms, event.kind);
            if !task.is_empty() {
                line.push(' ');
                line.push_str(task);
            }
            if !event.details().is_empty() {
                line.push_str(" - ");
                line.push_str(event.details());
            }
            writeln!(text, "{line}")
        };
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "timeline",
            "trace.json",
            "--width",
            "800",
            "--order",
            "sort",
            "--hide",
            "radio",
            "--hide",
            "beacon",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.width, Some(800.0));
        assert_eq!(cli.order, OrderArg::Sort);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.hidden, vec!["radio", "beacon"]);
        assert!(!cli.events);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from(["timeline", "t.json", "--window", "250"]).unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config, TimelineConfig::default().with_window(250));
    }

    #[test]
    fn test_invalid_width_rejected() {
        let cli = Cli::try_parse_from(["timeline", "t.json", "--width", "0"]).unwrap();
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_event_log_lines() {
        let events = vec![
            TraceEvent::new(0, "dispatch_cycle_start"),
            TraceEvent::new(1, "task_log")
                .with_task("blink")
                .with_details("led on"),
            TraceEvent::new(2, "task_discovered")
                .with_task("blink")
                .with_details("period=1000 index=0"),
        ];
        let mut selection = TaskSelection::none();
        selection.select("blink");

        let text = render_event_log(&events, &selection, EventLogFilter::default());
        assert_eq!(
            text,
            "Events\n  [0ms] dispatch_cycle_start\n  [1ms]     blink: led on\n  [2ms] task_discovered blink - period=1000 index=0\n"
        );
    }
}
