//! Timeline error types.
//!
//! Reconstruction itself never fails. These errors only come from the
//! loading and configuration boundaries.

use thiserror::Error;

/// Timeline result type.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Errors raised while loading traces or configuration.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Trace document is not valid JSON or does not match the schema
    #[error("invalid trace document: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("invalid configuration file: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Trace timestamps go backwards
    #[error("event {position} at {time_ms}ms precedes the previous event at {previous_ms}ms")]
    OutOfOrder {
        position: usize,
        previous_ms: u64,
        time_ms: u64,
    },
}
