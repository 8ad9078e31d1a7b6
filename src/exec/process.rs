// src/exec/process.rs

//! Start a process, wait for it, report how it ended.
//!
//! Failures are split three ways:
//! - the OS refused to start the process (`ProcessSpawn`);
//! - waiting for it failed (`ProcessWait`);
//! - it ran and exited unsuccessfully. `run` returns that as an
//!   `ExitStatus`; only the `_checked` / `capture` helpers turn it into
//!   `ProcessExit`.

use std::process::{ExitStatus, Stdio};

use tracing::debug;

use crate::ambient;
use crate::errors::{GirError, Result};
use crate::fs;

use super::command::{ProcessCommand, Token};

/// Run the command made of `tokens` and return its exit status.
///
/// Blocks until the process exits. A non-zero exit is not an error here.
pub fn run<I, T>(tokens: I) -> Result<ExitStatus>
where
    I: IntoIterator<Item = T>,
    T: Into<Token>,
{
    run_command(&ProcessCommand::from_tokens(tokens))
}

/// Like [`run`], but a non-zero exit becomes `ProcessExit`.
pub fn run_checked<I, T>(tokens: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<Token>,
{
    let command = ProcessCommand::from_tokens(tokens);
    let status = run_command(&command)?;
    ensure_success(&command, status)
}

/// Run the command and return what it wrote to stdout.
///
/// Stderr is inherited. A non-zero exit becomes `ProcessExit`. Output is
/// decoded lossily: bytes that are not valid UTF-8 become `U+FFFD`.
pub fn capture<I, T>(tokens: I) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: Into<Token>,
{
    let command = in_current_directory(ProcessCommand::from_tokens(tokens))?;
    let mut cmd = command.to_command()?;
    cmd.stdout(Stdio::piped());

    announce(&command);
    let child = cmd.spawn().map_err(|source| spawn_error(&command, source))?;
    let output = child
        .wait_with_output()
        .map_err(|source| wait_error(&command, source))?;

    report_exit(&command, output.status);
    ensure_success(&command, output.status)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a prepared command and return its exit status.
///
/// Without an explicit working directory the command runs in
/// [`fs::current_directory`].
pub fn run_command(command: &ProcessCommand) -> Result<ExitStatus> {
    let command = in_current_directory(command.clone())?;
    let mut cmd = command.to_command()?;

    announce(&command);
    let mut child = cmd.spawn().map_err(|source| spawn_error(&command, source))?;
    let status = child
        .wait()
        .map_err(|source| wait_error(&command, source))?;

    report_exit(&command, status);
    Ok(status)
}

/// Async counterpart of [`run`] built on `tokio::process`, for use inside
/// [`GirContext::spawn`](crate::GirContext::spawn).
///
/// The child is killed if the returned future is dropped before it exits.
pub async fn run_async<I, T>(tokens: I) -> Result<ExitStatus>
where
    I: IntoIterator<Item = T>,
    T: Into<Token>,
{
    let command = in_current_directory(ProcessCommand::from_tokens(tokens))?;
    let mut cmd = command.to_async_command()?;

    announce(&command);
    let mut child = cmd.spawn().map_err(|source| spawn_error(&command, source))?;
    let status = child
        .wait()
        .await
        .map_err(|source| wait_error(&command, source))?;

    report_exit(&command, status);
    Ok(status)
}

fn in_current_directory(mut command: ProcessCommand) -> Result<ProcessCommand> {
    if command.working_dir().is_none() {
        command.current_dir(fs::current_directory()?);
    }
    Ok(command)
}

fn ensure_success(command: &ProcessCommand, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(GirError::ProcessExit {
            command: command.argv().to_vec(),
            code: status.code(),
        })
    }
}

fn announce(command: &ProcessCommand) {
    debug!(
        cmd = %command,
        dir = ?command.working_dir(),
        "starting process"
    );
    if let Some(context) = ambient::try_context() {
        context.messenger().debug(&format!("exec: {command}"));
    }
}

fn report_exit(command: &ProcessCommand, status: ExitStatus) {
    debug!(
        cmd = %command,
        exit_code = ?status.code(),
        success = status.success(),
        "process exited"
    );
}

fn spawn_error(command: &ProcessCommand, source: std::io::Error) -> GirError {
    GirError::ProcessSpawn {
        command: command.argv().to_vec(),
        source,
    }
}

pub(crate) fn wait_error(command: &ProcessCommand, source: std::io::Error) -> GirError {
    GirError::ProcessWait {
        command: command.argv().to_vec(),
        source,
    }
}
