//! Telemetry configuration, read from the environment.

use std::str::FromStr;

use crate::error::TelemetryError;

/// Output format for log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable terminal output
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(TelemetryError::UnknownFormat(other.to_string())),
        }
    }
}

/// Subscriber settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
    /// Running under the test harness
    pub test_mode: bool,
    /// `TEST_LOG` was set
    pub test_log: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
            test_mode: false,
            test_log: false,
        }
    }
}

impl TelemetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `RUST_LOG`, `LOG_FORMAT` and `TEST_LOG`.
    ///
    /// An unrecognized `LOG_FORMAT` falls back to pretty output.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(filter) = lookup("RUST_LOG").filter(|f| !f.is_empty()) {
            config.filter = filter;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.format = format.parse().unwrap_or_default();
        }
        config.test_log = lookup("TEST_LOG").is_some();
        config
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Tests stay quiet unless `TEST_LOG` is set.
    pub fn should_suppress_logs(&self) -> bool {
        self.test_mode && !self.test_log
    }
}
