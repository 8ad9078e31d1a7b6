// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::LogLevel;

/// Configuration file as read from TOML, before validation.
///
/// ```toml
/// [context]
/// log_level = "debug"
/// max_blocking_threads = 16
/// thread_keep_alive_secs = 30
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Settings for every [`GirContext`](crate::GirContext) built from this file.
    #[serde(default)]
    pub context: ContextOptions,
}

/// Validated configuration. Only constructible via `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub context: ContextOptions,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(context: ContextOptions) -> Self {
        Self { context }
    }
}

/// `[context]` section: how a context sizes its worker pool and filters
/// messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Threshold of the context's default messenger.
    pub log_level: LogLevel,

    /// Threads driving async work submitted with `GirContext::spawn`.
    pub worker_threads: usize,

    /// Upper bound for the elastic pool that runs `GirContext::run` work.
    /// Threads are only created when work is waiting.
    pub max_blocking_threads: usize,

    /// Idle pool threads are reclaimed after this many seconds.
    pub thread_keep_alive_secs: u64,

    /// Name given to pool threads.
    pub thread_name: String,

    /// How long `close` waits for the runtime's own housekeeping once all
    /// submitted work has drained.
    pub shutdown_timeout_secs: u64,
}

impl ContextOptions {
    pub fn thread_keep_alive(&self) -> Duration {
        Duration::from_secs(self.thread_keep_alive_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_max_blocking_threads(mut self, threads: usize) -> Self {
        self.max_blocking_threads = threads;
        self
    }
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            worker_threads: 2,
            max_blocking_threads: 512,
            thread_keep_alive_secs: 60,
            thread_name: "gir-worker".to_string(),
            shutdown_timeout_secs: 5,
        }
    }
}
