// src/config/validate.rs

use crate::config::model::{ConfigFile, ContextOptions, RawConfigFile};
use crate::errors::{GirError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = GirError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_options(&raw.context)?;
        Ok(ConfigFile::new_unchecked(raw.context))
    }
}

/// Check the invariants a worker pool needs before it can be built.
pub fn validate_options(options: &ContextOptions) -> Result<()> {
    if options.worker_threads == 0 {
        return Err(GirError::ConfigError(
            "[context].worker_threads must be >= 1 (got 0)".to_string(),
        ));
    }

    if options.max_blocking_threads == 0 {
        return Err(GirError::ConfigError(
            "[context].max_blocking_threads must be >= 1 (got 0)".to_string(),
        ));
    }

    if options.thread_name.trim().is_empty() {
        return Err(GirError::ConfigError(
            "[context].thread_name must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_options(&ContextOptions::default()).is_ok());
    }

    #[test]
    fn zero_blocking_threads_is_rejected() {
        let options = ContextOptions::default().with_max_blocking_threads(0);
        match validate_options(&options) {
            Err(GirError::ConfigError(msg)) => assert!(msg.contains("max_blocking_threads")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn blank_thread_name_is_rejected() {
        let options = ContextOptions {
            thread_name: "  ".to_string(),
            ..ContextOptions::default()
        };
        assert!(matches!(
            validate_options(&options),
            Err(GirError::ConfigError(_))
        ));
    }
}
