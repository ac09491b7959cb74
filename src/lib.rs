//! `termtile` - Differential truecolor tile renderer for terminals
//!
//! Draws a grid of [`Tile`]s (character, foreground, background) to an
//! ANSI/VT terminal using 24-bit color escape sequences. A cache of what the
//! terminal currently shows keeps the output per frame down to the tiles
//! that actually changed.
//!
//! ```no_run
//! use termtile::{Console, Renderer, Rgb};
//!
//! let mut renderer = Renderer::new(None)?;
//! let mut console = Console::new(40, 10);
//! console.print(1, 1, "hello", Rgb::YELLOW, Rgb::BLUE);
//! renderer.present(&console)?;
//! renderer.close()?;
//! # Ok::<(), termtile::Error>(())
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)] // Unsafe code needs justification (required for termios/console FFI)
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for color math
#![allow(clippy::cast_possible_wrap)] // Intentional codepoint conversions
#![allow(clippy::module_name_repetitions)] // Allow renderer::RendererOptions etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod ansi;
pub mod color;
pub mod console;
pub mod error;
pub mod event;
pub mod renderer;
pub mod terminal;
pub mod tile;
pub mod unicode;

// Re-export core types at crate root
pub use color::Rgb;
pub use console::Console;
pub use error::{Error, Result};
pub use event::{
    LogLevel, clear_event_callback, clear_log_callback, emit_event, emit_log, set_event_callback,
    set_log_callback,
};
pub use tile::Tile;

// Re-export commonly used types
pub use renderer::{FrameDiff, PresentStats, Renderer, RendererOptions, TileCache};
pub use terminal::{ExitHooks, Session, SessionState, registered_sessions, run_exit_hooks};
#[cfg(unix)]
pub use terminal::{RawModeGuard, enable_raw_mode, is_tty, terminal_size};
pub use unicode::{EncodedChar, encode_codepoint};
