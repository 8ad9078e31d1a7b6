// src/ambient.rs

//! Process-wide "current context" and the scoped entry point that owns it.
//!
//! Exactly one top-level [`go`] scope may be active at a time. Starting a
//! second one (nested, or from another thread) is rejected with
//! `ContextAlreadyActive` rather than overwriting the active context.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::{self, ContextOptions};
use crate::context::GirContext;
use crate::errors::{GirError, Result};

static AMBIENT: Mutex<Option<Arc<GirContext>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Arc<GirContext>>> {
    AMBIENT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Return the context of the enclosing [`go`] action.
///
/// A context that has already been closed is never returned: work still
/// draining after its scope ended sees `NoActiveContext`.
pub fn context() -> Result<Arc<GirContext>> {
    try_context().ok_or(GirError::NoActiveContext)
}

/// Like [`context`], but `None` outside a scope.
pub fn try_context() -> Option<Arc<GirContext>> {
    slot().clone().filter(|context| !context.is_closed())
}

/// Install (or clear, with `None`) the ambient context directly, returning
/// the previous one.
///
/// This bypasses the lifecycle managed by [`go`]: the caller is responsible
/// for closing whatever it installs.
pub fn set_context(context: Option<Arc<GirContext>>) -> Option<Arc<GirContext>> {
    std::mem::replace(&mut *slot(), context)
}

/// Run `action` inside a fresh context.
///
/// Options come from [`config::load_or_default`]: `$GIR_CONFIG`, else
/// `Gir.toml` in the working directory, else built-in defaults.
///
/// The context is ambient for the duration of the action and is closed
/// (draining all work scheduled on it) and cleared on every exit path,
/// including panics. The action's error is returned unchanged.
pub fn go<T, E, F>(action: F) -> std::result::Result<T, E>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: From<GirError>,
{
    let file = config::load_or_default()?;
    go_with(&file.context, action)
}

/// [`go`] with explicit context options.
pub fn go_with<T, E, F>(options: &ContextOptions, action: F) -> std::result::Result<T, E>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: From<GirError>,
{
    let scope = AmbientScope::enter(options)?;
    let result = action();
    let closed = scope.exit();

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!(error = %close_err, "closing context failed after action error");
            Err(err)
        }
    }
}

/// Guard owning the ambient slot for one `go` scope.
///
/// `exit` performs the normal release; `Drop` covers unwinding.
struct AmbientScope {
    context: Option<Arc<GirContext>>,
}

impl AmbientScope {
    fn enter(options: &ContextOptions) -> Result<Self> {
        let mut slot = slot();
        if slot.is_some() {
            return Err(GirError::ContextAlreadyActive);
        }

        let context = Arc::new(GirContext::with_options(options)?);
        *slot = Some(Arc::clone(&context));
        info!("gir context opened");

        Ok(Self {
            context: Some(context),
        })
    }

    fn exit(mut self) -> Result<()> {
        match self.context.take() {
            Some(context) => release(&context),
            None => Ok(()),
        }
    }
}

impl Drop for AmbientScope {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            debug!("releasing gir context while unwinding");
            if let Err(err) = release(&context) {
                warn!(error = %err, "closing context failed while unwinding");
            }
        }
    }
}

/// Close `context`, then clear the slot if it still holds `context`.
///
/// The slot is cleared by a guard, so it is emptied even if closing unwinds.
/// A context the action closed itself reports `AlreadyClosed`.
fn release(context: &Arc<GirContext>) -> Result<()> {
    let _clear = SlotClear { context };
    context.close()
}

struct SlotClear<'a> {
    context: &'a Arc<GirContext>,
}

impl Drop for SlotClear<'_> {
    fn drop(&mut self) {
        let mut slot = slot();
        if slot
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, self.context))
        {
            *slot = None;
        }
        drop(slot);
        info!("gir context closed");
    }
}
