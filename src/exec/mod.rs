// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] assembles argument vectors from possibly-absent tokens.
//! - [`process`] starts processes, waits for them and maps OS failures into
//!   [`GirError`](crate::errors::GirError).

pub mod command;
pub mod process;

pub use command::{ProcessCommand, Token};
pub use process::{capture, run, run_async, run_checked, run_command};
