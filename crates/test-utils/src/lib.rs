pub mod recording_messenger;

use std::sync::{Arc, Mutex, MutexGuard, Once, PoisonError};

use gir::GirContext;
use tracing_subscriber::{fmt, EnvFilter};

pub use recording_messenger::RecordingMessenger;

static INIT: Once = Once::new();
static SERIAL: Mutex<()> = Mutex::new(());

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Serialise tests that touch process-wide gir state (the ambient context
/// and the tracked current directory).
///
/// A test that panicked while holding the lock does not poison it for the
/// rest of the suite.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-test fixture: holds the serial lock, resets the tracked directory and
/// installs a fresh ambient context that is not tied to a `gir::go` scope.
///
/// On drop the context is cleared from the ambient slot and closed if the
/// test left it open.
pub struct GirTestGuard {
    context: Arc<GirContext>,
    _serial: MutexGuard<'static, ()>,
}

impl GirTestGuard {
    pub fn new() -> Self {
        init_tracing();
        let serial = serial();
        gir::fs::reset_current_directory();

        let context = Arc::new(GirContext::new().expect("building test context"));
        gir::set_context(Some(Arc::clone(&context)));

        Self {
            context,
            _serial: serial,
        }
    }

    /// A guard that holds the lock but leaves the ambient slot empty.
    pub fn without_context() -> Self {
        let guard = Self::new();
        gir::set_context(None);
        guard
    }

    pub fn context(&self) -> &Arc<GirContext> {
        &self.context
    }
}

impl Default for GirTestGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GirTestGuard {
    fn drop(&mut self) {
        gir::set_context(None);
        gir::fs::reset_current_directory();
        if !self.context.is_closed() {
            let _ = self.context.close();
        }
    }
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
