// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GirError {
    #[error("gir::context() invocation outside the context of a gir::go() action")]
    NoActiveContext,

    #[error("gir::go() invoked while another gir::go() action is active")]
    ContextAlreadyActive,

    #[error("GirContext::{0}() invoked on closed context")]
    ContextClosed(&'static str),

    #[error("GirContext::close() invoked on closed context")]
    AlreadyClosed,

    #[error("scheduled work was dropped before producing a result")]
    TaskAbandoned,

    #[error("command has no program to execute")]
    EmptyCommand,

    #[error("failed to start process {command:?}: {source}")]
    ProcessSpawn {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("error waiting for process {command:?}: {source}")]
    ProcessWait {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("process {command:?} exited with {}", describe_exit(.code))]
    ProcessExit { command: Vec<String>, code: Option<i32> },

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GirError {
    /// The command vector attached to a process failure, if any.
    pub fn command(&self) -> Option<&[String]> {
        match self {
            GirError::ProcessSpawn { command, .. }
            | GirError::ProcessWait { command, .. }
            | GirError::ProcessExit { command, .. } => Some(command),
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, GirError>;
