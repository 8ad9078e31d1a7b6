// src/context/task.rs

//! Handle to work scheduled on a context's worker pool.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::errors::{GirError, Result};

use super::pool::block_outside_runtime;

/// What a unit of work sends back: its value, or the payload of the panic
/// that ended it.
pub(crate) type Outcome<V> = std::thread::Result<V>;

/// Completion handle returned by [`GirContext::run`](super::GirContext::run)
/// and [`GirContext::spawn`](super::GirContext::spawn).
///
/// Synchronous callers use [`join`](TaskHandle::join); async callers can
/// `.await` the handle directly. A panic raised by the work is resumed in
/// whoever observes the handle.
pub struct TaskHandle<V> {
    rx: oneshot::Receiver<Outcome<V>>,
}

impl<V> TaskHandle<V> {
    pub(crate) fn new(rx: oneshot::Receiver<Outcome<V>>) -> Self {
        Self { rx }
    }
}

impl<V: Send> TaskHandle<V> {
    /// Block the current thread until the work completes.
    ///
    /// Callers on a Tokio runtime thread are moved off the runtime while
    /// they wait; async code should prefer `.await`.
    pub fn join(self) -> Result<V> {
        let rx = self.rx;
        match block_outside_runtime(move || rx.blocking_recv()) {
            Ok(outcome) => unwrap_outcome(outcome),
            Err(_) => Err(GirError::TaskAbandoned),
        }
    }
}

impl<V> Future for TaskHandle<V> {
    type Output = Result<V>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(unwrap_outcome(outcome)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(GirError::TaskAbandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<V> fmt::Debug for TaskHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").finish_non_exhaustive()
    }
}

fn unwrap_outcome<V>(outcome: Outcome<V>) -> Result<V> {
    match outcome {
        Ok(value) => Ok(value),
        Err(payload) => std::panic::resume_unwind(payload),
    }
}
