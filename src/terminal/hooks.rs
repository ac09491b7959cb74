//! Process-wide exit hooks.
//!
//! Every active session registers itself here. When the process is about to
//! go away (normal exit, panic, termination signal, console close) the
//! registered sessions are torn down so the terminal is left usable.
//!
//! The registry holds weak references: a session that is dropped normally
//! simply disappears from it. Each termination facility is installed at most
//! once per process, the first time a session asks for it.

#![allow(unsafe_code)]

use crate::event::{LogLevel, emit_log};
use bitflags::bitflags;
use std::sync::{Mutex, Once, OnceLock, PoisonError, Weak};
use std::time::Duration;

bitflags! {
    /// Termination facilities a session hooks into.
    ///
    /// Registration with the registry itself is unconditional; these flags
    /// only select which automatic triggers get installed. With
    /// `ExitHooks::empty()` the application is expected to call
    /// [`run_exit_hooks`] from its own termination path.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ExitHooks: u8 {
        /// Run on normal process exit (`atexit`), including `std::process::exit`.
        const ATEXIT = 1 << 0;
        /// Run from a panic hook, before the previously installed hook.
        const PANIC = 1 << 1;
        /// Run on termination signals (SIGINT, SIGTERM, SIGHUP, SIGQUIT) on
        /// Unix, or console control events on Windows.
        const SIGNALS = 1 << 2;
    }
}

/// What triggered a teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HookSource {
    Manual,
    AtExit,
    Panic,
    Signal(i32),
}

/// How long a hook-triggered teardown waits for a busy device.
const HOOK_LOCK_WAIT: Duration = Duration::from_millis(200);

impl HookSource {
    /// How long teardown may wait for the device and mode locks; `None`
    /// waits indefinitely.
    ///
    /// The panicking thread may itself hold the device lock. A signal or
    /// exit can arrive while another thread is stuck writing to a stalled
    /// device, and the process must still go on to terminate.
    pub(crate) fn lock_wait(self) -> Option<Duration> {
        match self {
            Self::Manual => None,
            Self::Panic => Some(Duration::ZERO),
            Self::AtExit | Self::Signal(_) => Some(HOOK_LOCK_WAIT),
        }
    }
}

/// Something the registry can tear down.
pub(crate) trait Teardown: Send + Sync {
    /// Perform teardown if it has not happened yet. Returns `true` when this
    /// call did the work.
    fn teardown_from_hook(&self, source: HookSource) -> bool;
}

struct Registry {
    next_id: u64,
    entries: Vec<(u64, Weak<dyn Teardown>)>,
}

fn registry() -> &'static Mutex<Registry> {
    static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        Mutex::new(Registry {
            next_id: 0,
            entries: Vec::new(),
        })
    })
}

/// Registry entry; removed when dropped.
#[derive(Debug)]
pub(crate) struct Registration {
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut reg = registry().lock().unwrap_or_else(PoisonError::into_inner);
        reg.entries.retain(|(id, _)| *id != self.id);
    }
}

/// Add `target` to the registry and install the requested facilities.
pub(crate) fn register(target: Weak<dyn Teardown>, hooks: ExitHooks) -> Registration {
    let id = {
        let mut reg = registry().lock().unwrap_or_else(PoisonError::into_inner);
        let id = reg.next_id;
        reg.next_id += 1;
        // Prune entries whose sessions are gone.
        reg.entries.retain(|(_, weak)| weak.strong_count() > 0);
        reg.entries.push((id, target));
        id
    };

    if hooks.contains(ExitHooks::ATEXIT) {
        install_atexit();
    }
    if hooks.contains(ExitHooks::PANIC) {
        install_panic_hook();
    }
    if hooks.contains(ExitHooks::SIGNALS) {
        install_signal_handler();
    }

    Registration { id }
}

/// Number of live sessions currently registered.
#[must_use]
pub fn registered_sessions() -> usize {
    let reg = registry().lock().unwrap_or_else(PoisonError::into_inner);
    reg.entries
        .iter()
        .filter(|(_, weak)| weak.strong_count() > 0)
        .count()
}

/// Tear down every registered session now.
///
/// For applications that handle termination themselves. Returns the number
/// of sessions this call actually terminated; sessions that already ended
/// are skipped.
pub fn run_exit_hooks() -> usize {
    run_hooks(HookSource::Manual)
}

pub(crate) fn run_hooks(source: HookSource) -> usize {
    // Upgrade under the lock, tear down outside it.
    let targets: Vec<_> = {
        let mut reg = registry().lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut reg.entries)
            .into_iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .collect()
    };

    let done = targets
        .iter()
        .filter(|target| target.teardown_from_hook(source))
        .count();

    if done > 0 {
        let level = if source == HookSource::Manual {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        };
        emit_log(level, &format!("exit hook ({source:?}) restored {done} session(s)"));
    }
    done
}

// ============================================
// atexit
// ============================================

extern "C" fn atexit_handler() {
    // Unwinding across the C boundary is undefined.
    let _ = std::panic::catch_unwind(|| run_hooks(HookSource::AtExit));
}

fn install_atexit() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        // SAFETY: registering a plain extern "C" function with no captured state.
        let rc = unsafe { libc::atexit(atexit_handler) };
        if rc != 0 {
            emit_log(LogLevel::Warn, "could not register atexit handler");
        }
    });
}

// ============================================
// Panic hook
// ============================================

fn install_panic_hook() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // Restore first so the panic message lands on the normal screen.
            run_hooks(HookSource::Panic);
            previous(info);
        }));
    });
}

// ============================================
// Signals
// ============================================

#[cfg(unix)]
fn install_signal_handler() {
    use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::iterator::Signals;

    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let mut signals = match Signals::new([SIGINT, SIGTERM, SIGHUP, SIGQUIT]) {
            Ok(signals) => signals,
            Err(e) => {
                emit_log(
                    LogLevel::Warn,
                    &format!("could not register signal handlers: {e}"),
                );
                return;
            }
        };

        let spawned = std::thread::Builder::new()
            .name("termtile-signals".into())
            .spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    run_hooks(HookSource::Signal(sig));
                    // Terminate the way the signal would have without us.
                    if let Err(e) = signal_hook::low_level::emulate_default_handler(sig) {
                        emit_log(
                            LogLevel::Error,
                            &format!("default action for signal {sig} failed: {e}"),
                        );
                        std::process::exit(128 + sig);
                    }
                }
            });
        if let Err(e) = spawned {
            emit_log(LogLevel::Warn, &format!("could not start signal thread: {e}"));
        }
    });
}

#[cfg(windows)]
fn install_signal_handler() {
    use windows_sys::Win32::Foundation::{BOOL, FALSE, TRUE};
    use windows_sys::Win32::System::Console::SetConsoleCtrlHandler;

    unsafe extern "system" fn ctrl_handler(ctrl_type: u32) -> BOOL {
        let _ = std::panic::catch_unwind(|| {
            run_hooks(HookSource::Signal(ctrl_type as i32));
        });
        // Let the next handler (ultimately the default one) end the process.
        FALSE
    }

    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        // SAFETY: the handler is a plain function valid for the process lifetime.
        let ok = unsafe { SetConsoleCtrlHandler(Some(ctrl_handler), TRUE) };
        if ok == 0 {
            emit_log(LogLevel::Warn, "could not register console control handler");
        }
    });
}

#[cfg(not(any(unix, windows)))]
fn install_signal_handler() {}
