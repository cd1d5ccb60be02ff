//! Structured logging setup for the timeline tools.
//!
//! Provides:
//! - JSON or pretty terminal output, picked from the environment
//! - `log` records bridged into `tracing`
//! - A quiet-by-default subscriber for tests
//!
//! # Quick Start
//!
//! ```rust,no_run
//! telemetry::init_default("timeline");
//! tracing::info!("ready");
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `RUST_LOG` - Log filter directive (default: "info")
//! - `LOG_FORMAT` - Output format: "json" or "pretty" (default: "pretty")
//! - `TEST_LOG` - If set, enables logs in test mode
//!
//! All output goes to stderr so stdout stays free for tool output.

pub mod config;
pub mod error;

pub use config::{LogFormat, TelemetryConfig};
pub use error::{Result, TelemetryError};

pub use tracing::{debug, error, info, trace, warn};

use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Initialize telemetry from environment variables.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_default(name: &str) {
    let config = TelemetryConfig::from_env();
    let _ = try_init_with_config(name, config);
}

/// Initialize telemetry with a custom default filter.
///
/// `RUST_LOG` still wins when it is set.
pub fn init_with_filter(name: &str, default_filter: &str) {
    let config = TelemetryConfig::from_env().with_filter(default_filter);
    let _ = try_init_with_config(name, config);
}

/// Initialize telemetry, ignoring a subscriber that is already installed.
pub fn init_with_config(name: &str, config: TelemetryConfig) {
    let _ = try_init_with_config(name, config);
}

/// Initialize telemetry and report why it failed, if it did.
pub fn try_init_with_config(name: &str, config: TelemetryConfig) -> Result<()> {
    // Redirect log crate to tracing
    let _ = LogTracer::init();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };

    match config.format {
        LogFormat::Json => {
            let formatting_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr);
            let subscriber = Registry::default()
                .with(env_filter)
                .with(formatting_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Pretty => {
            let formatting_layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr);
            let subscriber = Registry::default()
                .with(env_filter)
                .with(formatting_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    tracing::debug!(app = name, format = ?config.format, "telemetry initialized");
    Ok(())
}

/// Initialize telemetry for tests.
///
/// Logs are suppressed unless `TEST_LOG` is set, and the subscriber is
/// installed at most once per process.
pub fn init_test() {
    let config = TelemetryConfig::from_env().with_test_mode(true);

    if config.should_suppress_logs() {
        return;
    }

    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = LogTracer::init();

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.filter));

        let formatting_layer = fmt::layer().with_target(true).with_test_writer();

        let subscriber = Registry::default()
            .with(env_filter)
            .with(formatting_layer);

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
