//! Telemetry error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelemetryError>;

#[derive(Debug, Error)]
pub enum TelemetryError {
    /// `LOG_FORMAT` holds something other than json or pretty
    #[error("unknown log format: {0}")]
    UnknownFormat(String),

    /// A global subscriber was already installed
    #[error("failed to install subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Filter directive did not parse
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
}
