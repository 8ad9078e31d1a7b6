// src/lib.rs

//! Scoped execution environment for short-lived automation scripts.
//!
//! A script wraps its body in [`go`]. For the duration of that call a
//! [`GirContext`] is ambient: the body (and anything it calls) can fetch it
//! with [`context`] to schedule work on the context's worker pool, while
//! [`exec`] runs external processes and [`fs::in_directory`] scopes them to a
//! working directory. When the body returns (or fails, or panics) the
//! context is closed, which waits for all scheduled work to finish.
//!
//! ```no_run
//! use gir::{argv, exec, fs};
//!
//! fn main() -> anyhow::Result<()> {
//!     gir::go(|| {
//!         let ctx = gir::context()?;
//!         let fetch = ctx.run(|| exec::run_checked(["git", "fetch"]))?;
//!
//!         let branch: Option<&str> = None;
//!         fs::in_directory("vendor", || exec::run_checked(argv!["git", "pull", "origin", branch]))?;
//!
//!         fetch.join()??;
//!         Ok(())
//!     })
//! }
//! ```

pub mod ambient;
pub mod config;
pub mod context;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod messenger;
pub mod types;

pub use ambient::{context, go, go_with, set_context, try_context};
pub use config::ContextOptions;
pub use context::{GirContext, TaskHandle};
pub use errors::{GirError, Result};
pub use messenger::{Messenger, StandardMessenger};
pub use types::LogLevel;
