// src/logging.rs

//! Logging setup for gir using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. the level passed by the caller (if any)
//! 2. `GIR_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs are sent to STDERR so that process stdout stays clean for the
//! commands a script runs.

use anyhow::anyhow;
use tracing_subscriber::fmt;

use crate::errors::Result;
use crate::types::LogLevel;

pub const LOG_ENV: &str = "GIR_LOG";

/// Initialise the global logging subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_max_level(tracing::Level::from(level))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

fn resolve_level(explicit: Option<LogLevel>, env: Option<&str>) -> LogLevel {
    explicit
        .or_else(|| env.and_then(|s| s.parse().ok()))
        .unwrap_or_default()
}
