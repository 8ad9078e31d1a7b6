// src/messenger.rs

//! Leveled message sink attached to every [`GirContext`](crate::GirContext).
//!
//! Scripts report progress through the context's messenger rather than
//! printing directly, so a harness can swap the sink (e.g. to record
//! messages in tests) without touching the script.

use std::fmt;

use tracing::{debug, error, info, trace, warn};

use crate::types::LogLevel;

/// Capability to accept leveled log messages.
pub trait Messenger: Send + Sync + fmt::Debug {
    fn log(&self, level: LogLevel, message: &str);

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
}

/// Default messenger: drops anything more verbose than `threshold` and
/// forwards the rest to `tracing` under the `gir::messenger` target.
#[derive(Debug, Clone, Copy)]
pub struct StandardMessenger {
    threshold: LogLevel,
}

impl StandardMessenger {
    pub fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.is_enabled_at(self.threshold)
    }
}

impl Default for StandardMessenger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl Messenger for StandardMessenger {
    fn log(&self, level: LogLevel, message: &str) {
        if !self.is_enabled(level) {
            return;
        }

        // `tracing` macros need the level at compile time.
        match level {
            LogLevel::Error => error!(target: "gir::messenger", "{message}"),
            LogLevel::Warn => warn!(target: "gir::messenger", "{message}"),
            LogLevel::Info => info!(target: "gir::messenger", "{message}"),
            LogLevel::Debug => debug!(target: "gir::messenger", "{message}"),
            LogLevel::Trace => trace!(target: "gir::messenger", "{message}"),
        }
    }
}
