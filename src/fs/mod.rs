// src/fs/mod.rs

//! Filesystem helpers scoped to a tracked "current directory".
//!
//! The real process working directory is never changed: it is shared by
//! every thread. Instead gir tracks its own current directory, which
//! [`exec`](crate::exec) uses as the working directory of spawned processes
//! and [`resolve`] uses for relative paths.

mod directory;

pub use directory::{
    current_directory, cwd, in_directory, reset_current_directory, resolve,
    set_current_directory,
};
