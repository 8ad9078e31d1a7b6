// src/context/pool.rs

//! Elastic worker pool owned by a single [`GirContext`](super::GirContext).
//!
//! Backed by a private Tokio runtime:
//! - blocking work goes to the runtime's blocking pool, which spawns threads
//!   on demand (up to `max_blocking_threads`) and reclaims them after
//!   `thread_keep_alive` of idleness;
//! - async work runs on the runtime's worker threads.
//!
//! Every accepted unit of work carries a clone of the pool's drain token (an
//! `mpsc::Sender<()>`). Shutting down drops the pool's own sender and waits on
//! the receiver, which only reports closure once every clone is gone, i.e.
//! once all accepted work has finished.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::{ContextOptions, validate_options};
use crate::errors::{GirError, Result};

use super::task::{Outcome, TaskHandle};

/// Live half of the pool. `None` once the pool has been shut down.
struct PoolState {
    runtime: Runtime,
    drain_token: mpsc::Sender<()>,
}

pub(crate) struct WorkerPool {
    state: Mutex<Option<PoolState>>,
    drained: Mutex<Option<mpsc::Receiver<()>>>,
    shutdown_timeout: Duration,
}

impl WorkerPool {
    pub(crate) fn new(options: &ContextOptions) -> Result<Self> {
        validate_options(options)?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(options.worker_threads)
            .max_blocking_threads(options.max_blocking_threads)
            .thread_keep_alive(options.thread_keep_alive())
            .thread_name(options.thread_name.clone())
            .enable_all()
            .build()?;

        let (drain_token, drained) = mpsc::channel::<()>(1);

        debug!(
            worker_threads = options.worker_threads,
            max_blocking_threads = options.max_blocking_threads,
            "worker pool started"
        );

        Ok(Self {
            state: Mutex::new(Some(PoolState {
                runtime,
                drain_token,
            })),
            drained: Mutex::new(Some(drained)),
            shutdown_timeout: options.shutdown_timeout(),
        })
    }

    pub(crate) fn is_shut_down(&self) -> bool {
        self.lock_state().is_none()
    }

    /// Run a blocking closure on the elastic pool.
    ///
    /// `operation` names the public entry point for the closed-context error.
    pub(crate) fn submit<F, V>(&self, operation: &'static str, action: F) -> Result<TaskHandle<V>>
    where
        F: FnOnce() -> V + Send + 'static,
        V: Send + 'static,
    {
        // Holding the state lock while spawning keeps a concurrent shutdown
        // from slipping in between the open check and the submission.
        let guard = self.lock_state();
        let state = guard.as_ref().ok_or(GirError::ContextClosed(operation))?;

        let token = state.drain_token.clone();
        let (tx, rx) = oneshot::channel::<Outcome<V>>();

        state.runtime.spawn_blocking(move || {
            let _token = token;
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(action));
            let _ = tx.send(outcome);
        });

        Ok(TaskHandle::new(rx))
    }

    /// Run a future on the pool's async workers.
    pub(crate) fn spawn<F>(&self, operation: &'static str, future: F) -> Result<TaskHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let guard = self.lock_state();
        let state = guard.as_ref().ok_or(GirError::ContextClosed(operation))?;

        let token = state.drain_token.clone();
        let (tx, rx) = oneshot::channel::<Outcome<F::Output>>();

        let inner = state.runtime.spawn(future);
        state.runtime.spawn(async move {
            let _token = token;
            let outcome = match inner.await {
                Ok(value) => Ok(value),
                Err(err) => match err.try_into_panic() {
                    Ok(payload) => Err(payload),
                    // Cancelled: dropping `tx` reports the work as abandoned.
                    Err(_) => return,
                },
            };
            let _ = tx.send(outcome);
        });

        Ok(TaskHandle::new(rx))
    }

    /// Refuse new work, wait for accepted work to drain, then stop the
    /// runtime.
    ///
    /// Blocks the calling thread. Safe to call from a thread driving another
    /// Tokio runtime (see [`block_outside_runtime`]), but not from work
    /// running on this pool.
    pub(crate) fn shutdown(&self) -> Result<()> {
        let state = self.lock_state().take().ok_or(GirError::AlreadyClosed)?;
        let PoolState {
            runtime,
            drain_token,
        } = state;
        drop(drain_token);

        let drained = self
            .drained
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let shutdown_timeout = self.shutdown_timeout;

        block_outside_runtime(move || {
            if let Some(mut drained) = drained {
                debug!("waiting for scheduled work to drain");
                // Yields `None` once the last outstanding token is dropped.
                let _ = drained.blocking_recv();
            }
            runtime.shutdown_timeout(shutdown_timeout);
        });

        info!("worker pool drained and shut down");
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<PoolState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Run a blocking closure from any thread.
///
/// Tokio panics when a runtime thread blocks on a channel or drops a
/// runtime. On a multi-threaded runtime the closure runs under
/// `block_in_place`; on a current-thread runtime it runs on a scoped helper
/// thread that the caller joins. Elsewhere it runs inline.
pub(crate) fn block_outside_runtime<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(f),
        Ok(_) => std::thread::scope(|scope| match scope.spawn(f).join() {
            Ok(value) => value,
            Err(payload) => std::panic::resume_unwind(payload),
        }),
        Err(_) => f(),
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Pools that were never shut down explicitly are torn down without
        // waiting; the last owner may be one of the pool's own threads.
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(state) = state {
            state.runtime.shutdown_background();
        }
    }
}
