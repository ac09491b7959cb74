//! Exit-hook registry behavior seen from the public API.
//!
//! `run_exit_hooks` reaches every live session in the process, so the tests
//! in this binary run one at a time.

mod fixtures;

use fixtures::*;
use std::sync::{Mutex, MutexGuard, PoisonError};
use termtile::{Console, SessionState, registered_sessions, run_exit_hooks};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

const EXIT: &[u8] = b"\x1b[2J\x1b[?1049l\x1b[?25h";

#[test]
fn test_hook_terminates_active_renderer() {
    let _serial = serial();
    let term = MockTerminal::new();
    let renderer = test_renderer(&term);

    assert_eq!(run_exit_hooks(), 1);
    assert_eq!(renderer.state(), SessionState::Terminated);
    assert_eq!(term.take_output(), EXIT);

    // Explicit teardown afterwards is a no-op.
    renderer.close().unwrap();
    assert!(term.output().is_empty());
}

#[test]
fn test_present_after_hook_is_dropped() {
    let _serial = serial();
    let term = MockTerminal::new();
    let mut renderer = test_renderer(&term);
    let frame = Console::new(4, 2);
    renderer.present(&frame).unwrap();

    run_exit_hooks();
    term.clear_output();

    let diff = renderer.present(&frame).unwrap();
    assert!(diff.is_empty());
    assert!(term.output().is_empty(), "nothing written after teardown");
    assert_eq!(renderer.stats().frames, 1);
}

#[test]
fn test_close_then_hook_runs_nothing() {
    let _serial = serial();
    let term = MockTerminal::new();
    let renderer = test_renderer(&term);
    renderer.close().unwrap();

    assert_eq!(run_exit_hooks(), 0);
    assert_eq!(term.count_sequence(EXIT), 1);
}

#[test]
fn test_hook_reaches_every_session() {
    let _serial = serial();
    let terms = [MockTerminal::new(), MockTerminal::new(), MockTerminal::new()];
    let renderers: Vec<_> = terms.iter().map(test_renderer).collect();
    assert_eq!(registered_sessions(), 3);

    assert_eq!(run_exit_hooks(), 3);
    for (term, renderer) in terms.iter().zip(&renderers) {
        assert_eq!(renderer.state(), SessionState::Terminated);
        assert_eq!(term.count_sequence(EXIT), 1);
    }
    drop(renderers);
    for term in &terms {
        assert_eq!(term.count_sequence(EXIT), 1, "drop after hook repeats nothing");
    }
}

#[test]
fn test_dropped_renderer_leaves_registry() {
    let _serial = serial();
    let term = MockTerminal::new();
    drop(test_renderer(&term));
    assert_eq!(registered_sessions(), 0);
    assert_eq!(run_exit_hooks(), 0);
}
