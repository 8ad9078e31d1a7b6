// src/context/mod.rs

//! Execution context for one gir session.
//!
//! A [`GirContext`] owns a worker pool and a messenger. Scripts schedule
//! work through it while it is open; closing it refuses further work and
//! blocks until everything already accepted has finished.
//!
//! - [`pool`] holds the elastic Tokio-backed pool and its drain logic.
//! - [`task`] defines the [`TaskHandle`] returned for scheduled work.

mod pool;
mod task;

use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::config::ContextOptions;
use crate::errors::Result;
use crate::messenger::{Messenger, StandardMessenger};

use pool::WorkerPool;
pub use task::TaskHandle;

pub struct GirContext {
    pool: WorkerPool,
    messenger: RwLock<Arc<dyn Messenger>>,
}

impl GirContext {
    /// Create a context with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(&ContextOptions::default())
    }

    pub fn with_options(options: &ContextOptions) -> Result<Self> {
        let pool = WorkerPool::new(options)?;
        let messenger: Arc<dyn Messenger> = Arc::new(StandardMessenger::new(options.log_level));
        Ok(Self {
            pool,
            messenger: RwLock::new(messenger),
        })
    }

    /// The messenger scripts should report progress through.
    pub fn messenger(&self) -> Arc<dyn Messenger> {
        self.messenger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_messenger(&self, messenger: Arc<dyn Messenger>) {
        *self.messenger.write().unwrap_or_else(PoisonError::into_inner) = messenger;
    }

    /// Schedule a blocking action to run on the worker pool.
    ///
    /// Fails with `ContextClosed` once the context has been closed.
    pub fn run<F, V>(&self, action: F) -> Result<TaskHandle<V>>
    where
        F: FnOnce() -> V + Send + 'static,
        V: Send + 'static,
    {
        let handle = self.pool.submit("run", action)?;
        debug!("scheduled blocking action");
        Ok(handle)
    }

    /// Schedule a future to run on the worker pool.
    ///
    /// Fails with `ContextClosed` once the context has been closed.
    pub fn spawn<F>(&self, future: F) -> Result<TaskHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handle = self.pool.spawn("spawn", future)?;
        debug!("scheduled async action");
        Ok(handle)
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_shut_down()
    }

    /// Close the context.
    ///
    /// Marks the context closed, then waits until every action scheduled
    /// before this call has completed. Fails with `AlreadyClosed` on a
    /// second call.
    pub fn close(&self) -> Result<()> {
        self.pool.shutdown()
    }
}

impl fmt::Debug for GirContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GirContext")
            .field("closed", &self.is_closed())
            .field("messenger", &self.messenger())
            .finish_non_exhaustive()
    }
}
