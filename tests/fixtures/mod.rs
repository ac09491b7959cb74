//! Test fixtures and helpers for termtile tests.
//!
//! - [`MockTerminal`] - Captures the escape stream without a real PTY
//! - [`screen`] - Feeds captured output through a `vt100` emulator
//! - [`logging`] - Routes renderer log callbacks into `tracing`

#![allow(clippy::nursery)] // Test fixtures prioritize clarity over pedantry
#![allow(clippy::pedantic)] // Test fixtures prioritize clarity over pedantry
#![allow(dead_code)] // Not every test binary uses every helper

pub mod logging;
pub mod mock_terminal;
pub mod screen;

pub use logging::*;
pub use mock_terminal::*;
pub use screen::*;

use termtile::{ExitHooks, Renderer, RendererOptions};

/// Options for renderers over mock devices: no mode capture, no process
/// hooks.
pub fn test_options() -> RendererOptions {
    RendererOptions {
        raw_mode: false,
        exit_hooks: ExitHooks::empty(),
        ..RendererOptions::default()
    }
}

/// Start a renderer on `term` and discard the setup sequence.
pub fn test_renderer(term: &MockTerminal) -> Renderer<MockTerminal> {
    let renderer = Renderer::with_options(term.clone(), test_options()).unwrap();
    term.clear_output();
    renderer
}
