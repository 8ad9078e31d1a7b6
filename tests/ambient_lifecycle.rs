// tests/ambient_lifecycle.rs

use std::error::Error;
use std::sync::{Arc, Mutex};

use gir::{ContextOptions, GirContext, GirError, LogLevel};
use gir_test_utils::GirTestGuard;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn context_outside_go_fails_with_stable_message() {
    let _guard = GirTestGuard::without_context();

    let err = gir::context().unwrap_err();
    assert!(matches!(err, GirError::NoActiveContext));
    assert_eq!(
        err.to_string(),
        "gir::context() invocation outside the context of a gir::go() action"
    );
    assert!(gir::try_context().is_none());
}

#[test]
fn go_installs_an_open_context_and_closes_it_afterwards() -> TestResult {
    let _guard = GirTestGuard::without_context();
    let seen: Arc<Mutex<Option<Arc<GirContext>>>> = Arc::new(Mutex::new(None));

    assert!(gir::context().is_err());
    let value = gir::go(|| -> Result<u32, GirError> {
        let ctx = gir::context()?;
        assert!(!ctx.is_closed());
        *seen.lock().unwrap() = Some(ctx);
        Ok(7)
    })?;

    assert_eq!(value, 7);
    assert!(matches!(gir::context(), Err(GirError::NoActiveContext)));
    let ctx = seen.lock().unwrap().take().expect("context captured");
    assert!(ctx.is_closed());
    Ok(())
}

#[derive(Debug)]
enum ScriptError {
    Gir(GirError),
    Failed(&'static str),
}

impl From<GirError> for ScriptError {
    fn from(err: GirError) -> Self {
        ScriptError::Gir(err)
    }
}

#[test]
fn action_error_is_propagated_unchanged_and_context_still_closes() {
    let _guard = GirTestGuard::without_context();
    let mut captured = None;

    let result: Result<(), ScriptError> = gir::go(|| {
        captured = Some(gir::context()?);
        Err(ScriptError::Failed("deploy failed"))
    });

    assert!(matches!(result, Err(ScriptError::Failed("deploy failed"))));
    assert!(captured.expect("context captured").is_closed());
    assert!(gir::try_context().is_none());
}

#[test]
fn panicking_action_still_closes_and_clears_the_context() {
    let _guard = GirTestGuard::without_context();
    let captured: Arc<Mutex<Option<Arc<GirContext>>>> = Arc::new(Mutex::new(None));

    let inner = Arc::clone(&captured);
    let outcome = std::panic::catch_unwind(move || {
        let _: Result<(), GirError> = gir::go(|| {
            *inner.lock().unwrap() = Some(gir::context()?);
            panic!("script bug");
        });
    });

    assert!(outcome.is_err());
    assert!(gir::try_context().is_none());
    let ctx = captured.lock().unwrap().take().expect("context captured");
    assert!(ctx.is_closed());
}

#[test]
fn nested_go_is_rejected() -> TestResult {
    let _guard = GirTestGuard::without_context();

    gir::go(|| -> Result<(), GirError> {
        let outer = gir::context()?;
        let nested: Result<(), GirError> = gir::go(|| Ok(()));
        assert!(matches!(nested, Err(GirError::ContextAlreadyActive)));

        // The outer scope is untouched.
        let still = gir::context()?;
        assert!(Arc::ptr_eq(&outer, &still));
        assert!(!still.is_closed());
        Ok(())
    })?;

    assert!(gir::try_context().is_none());
    Ok(())
}

#[test]
fn go_from_another_thread_while_active_is_rejected() -> TestResult {
    let _guard = GirTestGuard::without_context();

    gir::go(|| -> Result<(), GirError> {
        let other = std::thread::spawn(|| gir::go(|| -> Result<(), GirError> { Ok(()) }))
            .join()
            .expect("thread panicked");
        assert!(matches!(other, Err(GirError::ContextAlreadyActive)));
        Ok(())
    })?;
    Ok(())
}

#[test]
fn closing_inside_the_action_surfaces_already_closed() {
    let _guard = GirTestGuard::without_context();

    let result: Result<(), GirError> = gir::go(|| {
        gir::context()?.close()?;
        Ok(())
    });

    assert!(matches!(result, Err(GirError::AlreadyClosed)));
    assert!(gir::try_context().is_none());
}

#[test]
fn set_context_installs_and_clears_the_slot() -> TestResult {
    let guard = GirTestGuard::new();

    let installed = gir::context()?;
    assert!(Arc::ptr_eq(&installed, guard.context()));

    let previous = gir::set_context(None);
    assert!(previous.is_some_and(|p| Arc::ptr_eq(&p, guard.context())));
    assert!(gir::context().is_err());
    Ok(())
}

#[test]
fn go_with_applies_context_options() -> TestResult {
    let _guard = GirTestGuard::without_context();
    let options = ContextOptions::default().with_log_level(LogLevel::Debug);

    gir::go_with(&options, || -> Result<(), GirError> {
        let rendered = format!("{:?}", gir::context()?.messenger());
        assert!(rendered.contains("Debug"));
        Ok(())
    })?;
    Ok(())
}

#[test]
fn invalid_options_leave_the_slot_empty() {
    let _guard = GirTestGuard::without_context();
    let options = ContextOptions::default().with_max_blocking_threads(0);

    let result: Result<(), GirError> = gir::go_with(&options, || panic!("must not run"));
    assert!(matches!(result, Err(GirError::ConfigError(_))));
    assert!(gir::try_context().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn go_on_a_runtime_thread_closes_and_releases_the_slot() -> TestResult {
    let _guard = GirTestGuard::without_context();

    let value = gir::go(|| -> Result<u32, GirError> {
        let handle = gir::context()?.run(|| 3)?;
        handle.join()
    })?;
    assert_eq!(value, 3);
    assert!(gir::try_context().is_none());

    let later = std::thread::spawn(|| gir::go(|| Ok::<_, GirError>(4)))
        .join()
        .expect("plain thread panicked")?;
    assert_eq!(later, 4);
    Ok(())
}

#[tokio::test]
async fn go_on_a_current_thread_runtime_closes_and_releases_the_slot() -> TestResult {
    let _guard = GirTestGuard::without_context();

    gir::go(|| -> Result<(), GirError> {
        gir::context()?.run(|| std::thread::sleep(std::time::Duration::from_millis(20)))?;
        Ok(())
    })?;

    assert!(gir::try_context().is_none());
    gir::go(|| Ok::<_, GirError>(()))?;
    Ok(())
}
