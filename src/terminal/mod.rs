//! Terminal session management and mode handling.
//!
//! [`Session`] owns the output device and the captured terminal mode for
//! the lifetime of a renderer. The exit hooks (see [`ExitHooks`] and
//! [`run_exit_hooks`]) make sure a session is torn down even when the
//! process ends without dropping it.

#[cfg(windows)]
mod console_mode;
mod hooks;
#[cfg(unix)]
mod raw;
mod session;

#[cfg(windows)]
pub use console_mode::ConsoleModeGuard;
pub use hooks::{ExitHooks, registered_sessions, run_exit_hooks};
#[cfg(unix)]
pub use raw::{RawModeGuard, enable_raw_mode, is_tty, terminal_size};
pub use session::{Session, SessionState};
