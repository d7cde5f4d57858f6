// Integration tests for lifecycle interception and the failure boundaries

mod common;

use common::{FakeContext, FakeFrame, FakeHost, HostEvent};
use crashlens::config::ExplorerConfig;
use crashlens::errors::{ConfigError, EntryPoint, FailureKind, Fault};
use crashlens::host::Button;
use crashlens::model::value::Value;
use crashlens::shim::{Completion, Interceptor, Lifecycle};
use std::cell::Cell;
use std::rc::Rc;

fn finished(_: &mut FakeHost) -> Result<Completion, Fault> {
    Ok(Completion::Finished)
}

fn failing_context() -> FakeContext {
    FakeContext::new(vec![
        FakeFrame::file("main.lua", 12)
            .named("update")
            .local("x", Value::Number(3.0)),
        FakeFrame::native(),
    ])
}

/// Interceptor whose update fails on the given tick (1-based)
fn failing_on(tick: usize, calls: Rc<Cell<usize>>) -> Interceptor<FakeHost> {
    let lifecycle = Lifecycle::new(
        move |_: &mut FakeHost| {
            calls.set(calls.get() + 1);
            if calls.get() == tick {
                let context = failing_context();
                return Err(context.fault("main.lua:12: attempt to call a nil value"));
            }
            Ok(Completion::Finished)
        },
        finished,
    );
    Interceptor::new(lifecycle, ExplorerConfig::default()).unwrap()
}

#[test]
fn test_runs_user_callbacks_until_failure() {
    let calls = Rc::new(Cell::new(0));
    let mut interceptor = failing_on(3, calls.clone());
    let mut host = FakeHost::new();

    for _ in 0..2 {
        assert!(interceptor.update(&mut host).is_ok());
        assert!(interceptor.draw(&mut host).is_ok());
    }
    assert!(!interceptor.is_exploring());
    assert!(host.logs().is_empty());

    assert!(interceptor.update(&mut host).is_ok());
    assert!(interceptor.is_exploring());

    // User code never runs again
    for _ in 0..3 {
        assert!(interceptor.update(&mut host).is_ok());
        assert!(interceptor.draw(&mut host).is_ok());
    }
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_failure_logs_trace_before_reset() {
    let mut interceptor = failing_on(1, Rc::new(Cell::new(0)));
    let mut host = FakeHost::new();

    interceptor.update(&mut host).unwrap();

    let trace = "main.lua:12: attempt to call a nil value\nstack traceback:\n\t[fake]";
    assert_eq!(host.logs(), vec![trace]);
    let logged = host.position(&HostEvent::Log(trace.to_string())).unwrap();
    let reset = host.position(&HostEvent::Reset).unwrap();
    assert!(logged < reset);

    let session = interceptor.session().unwrap();
    assert_eq!(session.snapshot().kind(), FailureKind::Raised);
    assert_eq!(session.snapshot().trace(), trace);
    assert_eq!(session.frames().len(), 1);
    assert_eq!(session.selected(), 0);
}

#[test]
fn test_panic_in_callback_is_captured() {
    let lifecycle = Lifecycle::new(
        |_: &mut FakeHost| -> Result<Completion, Fault> { panic!("index out of range") },
        finished,
    );
    let mut interceptor = Interceptor::new(lifecycle, ExplorerConfig::default()).unwrap();
    let mut host = FakeHost::new();

    assert!(interceptor.update(&mut host).is_ok());

    let session = interceptor.session().unwrap();
    assert_eq!(session.snapshot().message(), "index out of range");
    assert!(session.snapshot().context().is_none());
    assert!(session.frames().is_empty());
    assert_eq!(host.logs(), vec!["index out of range"]);
}

#[test]
fn test_suspension_is_an_illegal_failure() {
    let lifecycle = Lifecycle::new(
        |_: &mut FakeHost| {
            Ok(Completion::Suspended(Some(Box::new(FakeContext::new(
                vec![FakeFrame::file("main.lua", 4).named("update")],
            )))))
        },
        finished,
    );
    let mut interceptor = Interceptor::new(lifecycle, ExplorerConfig::default()).unwrap();
    let mut host = FakeHost::new();

    interceptor.update(&mut host).unwrap();

    let session = interceptor.session().unwrap();
    assert_eq!(
        session.snapshot().kind(),
        FailureKind::IllegalSuspension(EntryPoint::Update)
    );
    assert_eq!(
        session.snapshot().message(),
        "update suspended instead of running to completion"
    );
    assert_eq!(session.frames().len(), 1);
}

#[test]
fn test_init_failure_skips_user_ticks() {
    let ticks = Rc::new(Cell::new(0));
    let counted = ticks.clone();
    let lifecycle = Lifecycle::new(
        move |_: &mut FakeHost| {
            counted.set(counted.get() + 1);
            Ok(Completion::Finished)
        },
        finished,
    )
    .with_init(|_: &mut FakeHost| Err(Fault::new("main.lua:1: bad init")));
    let mut interceptor = Interceptor::new(lifecycle, ExplorerConfig::default()).unwrap();
    let mut host = FakeHost::new();

    interceptor.init(&mut host).unwrap();
    assert!(interceptor.is_exploring());

    interceptor.update(&mut host).unwrap();
    interceptor.draw(&mut host).unwrap();
    assert_eq!(ticks.get(), 0);
}

#[test]
fn test_draw_failure_shows_explorer_in_same_call() {
    let lifecycle = Lifecycle::new(finished, |_: &mut FakeHost| {
        Err(failing_context().fault("main.lua:12: draw went wrong"))
    });
    let mut interceptor = Interceptor::new(lifecycle, ExplorerConfig::default()).unwrap();
    let mut host = FakeHost::new();

    interceptor.update(&mut host).unwrap();
    interceptor.draw(&mut host).unwrap();

    assert!(interceptor.is_exploring());
    let reset = host.position(&HostEvent::Reset).unwrap();
    let cleared = host.position(&HostEvent::Clear(1)).unwrap();
    assert!(reset < cleared);
    assert!(host.printed().contains(&"stack"));
    assert!(host.printed().contains(&"draw went wrong"));
}

#[test]
fn test_explorer_failure_keeps_original_trace() {
    let mut interceptor = failing_on(1, Rc::new(Cell::new(0)));
    let mut host = FakeHost::new();
    interceptor.update(&mut host).unwrap();

    host.panic_on_print = true;
    let failure = interceptor.draw(&mut host).unwrap_err();

    let trace = "main.lua:12: attempt to call a nil value\nstack traceback:\n\t[fake]";
    assert_eq!(failure.original_trace, trace);
    assert_eq!(failure.description, "print failed");
    assert_eq!(
        failure.to_string(),
        format!("{}\n\nerror explorer failed:\nprint failed", trace)
    );
    assert_eq!(
        host.logs().last().copied(),
        Some(failure.to_string().as_str())
    );

    // Still exploring; the next tick tries again
    assert!(interceptor.is_exploring());
    host.panic_on_print = false;
    assert!(interceptor.draw(&mut host).is_ok());
}

#[test]
fn test_population_failure_is_reported() {
    let lifecycle = Lifecycle::new(
        |_: &mut FakeHost| {
            let mut context = FakeContext::new(vec![FakeFrame::file("main.lua", 2)]);
            context.panic_on_frames = true;
            Err(context.fault("main.lua:2: boom"))
        },
        finished,
    );
    let mut interceptor = Interceptor::new(lifecycle, ExplorerConfig::default()).unwrap();
    let mut host = FakeHost::new();

    let failure = interceptor.update(&mut host).unwrap_err();
    assert_eq!(failure.description, "frame walk failed");
    assert!(failure.to_string().starts_with("main.lua:2: boom"));
    assert!(interceptor.is_exploring());
    assert_eq!(host.logs().len(), 2);
}

#[test]
fn test_rejects_invalid_config() {
    for scroll_smoothing in [0.0, 1.0] {
        let config = ExplorerConfig {
            scroll_smoothing,
            ..ExplorerConfig::default()
        };
        let result = Interceptor::<FakeHost>::new(Lifecycle::new(finished, finished), config);
        assert!(matches!(
            result,
            Err(ConfigError::SmoothingOutOfRange { .. })
        ));
    }
}

#[test]
fn test_failed_selection_keeps_previous_frame() {
    let lifecycle = Lifecycle::new(
        |_: &mut FakeHost| {
            let mut context = FakeContext::new(vec![
                FakeFrame::file("a.lua", 1).local("inner_only", Value::Nil),
                FakeFrame::file("b.lua", 5).local("outer_only", Value::Nil),
            ]);
            context.panic_on_locals = Some(1);
            Err(context.fault("boom"))
        },
        finished,
    );
    let mut interceptor = Interceptor::new(lifecycle, ExplorerConfig::default()).unwrap();
    let mut host = FakeHost::new()
        .with_file("a.lua", "x()\n")
        .with_file("b.lua", "1\n2\n3\n4\n5\n");
    interceptor.update(&mut host).unwrap();

    for _ in 0..2 {
        host.press(Button::Down);
        let failure = interceptor.update(&mut host).unwrap_err();
        host.end_tick();
        assert_eq!(failure.description, "locals unavailable");

        let session = interceptor.session().unwrap();
        assert_eq!(session.selected(), 0);
        assert_eq!(session.variables().roots()[0].name, "inner_only");
        assert_eq!(session.source().path(), Some("a.lua"));
        assert_eq!(session.source().current_line(), Some(1));
    }
}
