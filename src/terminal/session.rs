//! Terminal session lifecycle.
//!
//! A session moves `Uninitialized -> Active -> Terminated`, nothing else.
//! Entering captures the terminal mode and switches to the alternate screen;
//! terminating undoes both exactly once, whether triggered by an explicit
//! call, by `Drop`, or by one of the process-wide exit hooks.

use crate::ansi::{self, SESSION_ENTER, SESSION_EXIT};
use crate::error::Result;
use crate::event::{LogLevel, emit_event, emit_log};
use crate::terminal::hooks::{self, ExitHooks, HookSource, Registration, Teardown};
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};
use std::thread;
use std::time::{Duration, Instant};

#[cfg(unix)]
type ModeGuard = crate::terminal::raw::RawModeGuard;
#[cfg(windows)]
type ModeGuard = crate::terminal::console_mode::ConsoleModeGuard;

/// Lifecycle state of a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created, terminal untouched.
    Uninitialized,
    /// Alternate screen active, frames are written.
    Active,
    /// Terminal restored. Final.
    Terminated,
}

const UNINITIALIZED: u8 = 0;
const ACTIVE: u8 = 1;
const TERMINATED: u8 = 2;

impl SessionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            UNINITIALIZED => Self::Uninitialized,
            ACTIVE => Self::Active,
            _ => Self::Terminated,
        }
    }
}

/// Shared part of a session, reachable from the exit hooks.
struct SessionCore<W> {
    device: Mutex<W>,
    #[cfg(any(unix, windows))]
    mode: Mutex<Option<ModeGuard>>,
    state: AtomicU8,
}

/// Lock `lock`, giving up after `wait` (`None` waits indefinitely).
fn acquire<T>(lock: &Mutex<T>, wait: Option<Duration>) -> Option<MutexGuard<'_, T>> {
    let Some(wait) = wait else {
        return Some(lock.lock().unwrap_or_else(PoisonError::into_inner));
    };
    let deadline = Instant::now() + wait;
    loop {
        match lock.try_lock() {
            Ok(guard) => return Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => return Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) if Instant::now() >= deadline => return None,
            Err(TryLockError::WouldBlock) => thread::sleep(Duration::from_millis(5)),
        }
    }
}

impl<W: Write> SessionCore<W> {
    fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// `Active -> Terminated`. Every restoration step is attempted even when
    /// an earlier one fails; the first failure is returned.
    ///
    /// Locks are waited on for at most `wait`; a device still busy after
    /// that keeps its screen, but the mode is still restored.
    ///
    /// Returns `Ok(false)` when the session was not active.
    fn terminate(&self, wait: Option<Duration>) -> io::Result<bool> {
        if self
            .state
            .compare_exchange(ACTIVE, TERMINATED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(false);
        }

        let mut first_error: Option<io::Error> = None;
        let mut record = |step: &str, result: io::Result<()>| {
            if let Err(e) = result {
                emit_log(LogLevel::Warn, &format!("session teardown: {step} failed: {e}"));
                first_error.get_or_insert(e);
            }
        };

        match acquire(&self.device, wait) {
            Some(mut device) => {
                let result = device
                    .write_all(SESSION_EXIT.as_bytes())
                    .and_then(|()| device.flush());
                record("restoring screen", result);
            }
            None => emit_log(
                LogLevel::Warn,
                "session teardown: device busy, screen not restored",
            ),
        }

        #[cfg(any(unix, windows))]
        if let Some(mut mode) = acquire(&self.mode, wait) {
            if let Some(mut guard) = mode.take() {
                record("restoring terminal mode", guard.restore());
            }
        }

        emit_log(LogLevel::Info, "terminal session ended");
        emit_event("session.end", "{}");

        first_error.map_or(Ok(true), Err)
    }
}

impl<W: Write + Send> Teardown for SessionCore<W> {
    fn teardown_from_hook(&self, source: HookSource) -> bool {
        // Errors are already logged; nothing else can be done from here.
        self.terminate(source.lock_wait()).unwrap_or(true)
    }
}

/// A terminal session over an output device.
///
/// Frames are only written while the session is [`Active`](SessionState::Active);
/// anything presented after termination is dropped.
pub struct Session<W: Write + Send + 'static> {
    core: Arc<SessionCore<W>>,
    registration: Option<Registration>,
}

impl<W: Write + Send + 'static> Session<W> {
    /// Wrap `device` in an uninitialized session.
    pub fn new(device: W) -> Self {
        Self {
            core: Arc::new(SessionCore {
                device: Mutex::new(device),
                #[cfg(any(unix, windows))]
                mode: Mutex::new(None),
                state: AtomicU8::new(UNINITIALIZED),
            }),
            registration: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.core.state()
    }

    /// `Uninitialized -> Active`.
    ///
    /// With `raw_mode` the current terminal mode is captured and switched;
    /// when there is no terminal to capture this step is skipped. Then the
    /// alternate screen is entered and cleared, the cursor hidden and the
    /// title (if any) set. Finally the session registers with the exit hooks
    /// selected by `hooks`.
    ///
    /// Calling this on a session that is not uninitialized does nothing.
    pub fn enter(&mut self, title: Option<&str>, raw_mode: bool, hooks: ExitHooks) -> Result<()> {
        if self.state() != SessionState::Uninitialized {
            emit_log(LogLevel::Debug, "session already entered");
            return Ok(());
        }

        if raw_mode {
            self.capture_mode();
        }

        if let Err(e) = self.write_enter(title) {
            // Nothing to show for it; put the mode back and stay out of the
            // alternate screen for good.
            self.core.state.store(TERMINATED, Ordering::Release);
            self.release_mode();
            return Err(e.into());
        }

        self.core.state.store(ACTIVE, Ordering::Release);
        let weak: Weak<dyn Teardown> = Arc::downgrade(&self.core) as Weak<dyn Teardown>;
        self.registration = Some(hooks::register(weak, hooks));

        emit_log(LogLevel::Info, "terminal session started");
        emit_event(
            "session.start",
            &format!("{{\"title\":{},\"raw_mode\":{raw_mode}}}", title.is_some()),
        );
        Ok(())
    }

    fn write_enter(&self, title: Option<&str>) -> io::Result<()> {
        let mut device = self.core.device.lock().unwrap_or_else(PoisonError::into_inner);
        device.write_all(SESSION_ENTER.as_bytes())?;
        if let Some(title) = title {
            ansi::write_title(&mut *device, title)?;
        }
        device.flush()
    }

    #[cfg(any(unix, windows))]
    fn capture_mode(&self) {
        #[cfg(unix)]
        let captured = ModeGuard::new(&io::stdin());
        #[cfg(windows)]
        let captured = ModeGuard::new();

        match captured {
            Ok(guard) => {
                *self.core.mode.lock().unwrap_or_else(PoisonError::into_inner) = Some(guard);
            }
            Err(e) => emit_log(
                LogLevel::Debug,
                &format!("no terminal mode to capture: {e}"),
            ),
        }
    }

    #[cfg(not(any(unix, windows)))]
    fn capture_mode(&self) {
        emit_log(LogLevel::Debug, "no terminal mode to capture on this platform");
    }

    #[cfg(any(unix, windows))]
    fn release_mode(&self) {
        let mut mode = self.core.mode.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut guard) = mode.take() {
            if let Err(e) = guard.restore() {
                emit_log(LogLevel::Warn, &format!("restoring terminal mode failed: {e}"));
            }
        }
    }

    #[cfg(not(any(unix, windows)))]
    fn release_mode(&self) {}

    /// Write one assembled frame and flush it.
    ///
    /// Returns `Ok(false)` without writing when the session is not active.
    pub fn write_frame(&self, bytes: &[u8]) -> Result<bool> {
        let mut device = self.core.device.lock().unwrap_or_else(PoisonError::into_inner);
        // Checked under the device lock so a frame never follows the
        // teardown sequence.
        if self.state() != SessionState::Active {
            emit_log(LogLevel::Debug, "frame dropped: session not active");
            return Ok(false);
        }
        device.write_all(bytes)?;
        device.flush()?;
        Ok(true)
    }

    /// Tear down as a termination signal would.
    #[cfg(test)]
    pub(crate) fn terminate_from_signal(&self) -> bool {
        self.core.teardown_from_hook(HookSource::Signal(15))
    }

    /// `Active -> Terminated`.
    ///
    /// Idempotent: once terminated (by this call, by `Drop`, or by an exit
    /// hook) further calls return `Ok(())` without touching the terminal.
    /// Every restoration step runs; the first write error is returned.
    pub fn end(&mut self) -> Result<()> {
        let result = self.core.terminate(None);
        self.registration = None;
        result?;
        Ok(())
    }
}

impl<W: Write + Send + 'static> Drop for Session<W> {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

impl<W: Write + Send + 'static> std::fmt::Debug for Session<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("registered", &self.registration.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Cloneable in-memory device.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }

        fn count(&self, needle: &str) -> usize {
            let data = self.contents();
            data.windows(needle.len())
                .filter(|w| *w == needle.as_bytes())
                .count()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Device whose writes fail after `budget` calls.
    struct Failing {
        budget: Arc<AtomicUsize>,
    }

    impl Write for Failing {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget.load(Ordering::SeqCst) == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.budget.fetch_sub(1, Ordering::SeqCst);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn active(buf: &SharedBuf, title: Option<&str>) -> Session<SharedBuf> {
        let mut session = Session::new(buf.clone());
        session.enter(title, false, ExitHooks::empty()).unwrap();
        session
    }

    // ============================================
    // State Machine
    // ============================================

    #[test]
    fn test_new_session_is_uninitialized_and_silent() {
        let buf = SharedBuf::default();
        let session = Session::new(buf.clone());
        assert_eq!(session.state(), SessionState::Uninitialized);
        drop(session);
        assert!(buf.contents().is_empty(), "never-entered session writes nothing");
    }

    #[test]
    fn test_enter_writes_setup_sequence() {
        let buf = SharedBuf::default();
        let session = active(&buf, None);
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(buf.contents(), b"\x1b[?1049h\x1b[2J\x1b[?25l");
    }

    #[test]
    fn test_enter_with_title() {
        let buf = SharedBuf::default();
        let _session = active(&buf, Some("tiles"));
        assert!(buf.contents().ends_with(b"\x1b]0;tiles\x07"));
    }

    #[test]
    fn test_enter_twice_is_noop() {
        let buf = SharedBuf::default();
        let mut session = active(&buf, None);
        session.enter(Some("again"), false, ExitHooks::empty()).unwrap();
        assert_eq!(buf.count("\x1b[?1049h"), 1);
        assert_eq!(buf.count("again"), 0);
    }

    #[test]
    fn test_end_writes_teardown_once() {
        let buf = SharedBuf::default();
        let mut session = active(&buf, None);
        session.end().unwrap();
        session.end().unwrap();
        drop(session);
        assert_eq!(buf.count(SESSION_EXIT), 1);
    }

    #[test]
    fn test_drop_terminates() {
        let buf = SharedBuf::default();
        drop(active(&buf, None));
        assert!(buf.contents().ends_with(SESSION_EXIT.as_bytes()));
    }

    #[test]
    fn test_terminated_is_final() {
        let buf = SharedBuf::default();
        let mut session = active(&buf, None);
        session.end().unwrap();
        session.enter(None, false, ExitHooks::empty()).unwrap();
        assert_eq!(session.state(), SessionState::Terminated);
        assert_eq!(buf.count("\x1b[?1049h"), 1);
    }

    #[test]
    fn test_hook_teardown_then_end() {
        let buf = SharedBuf::default();
        let mut session = active(&buf, None);
        assert!(session.core.teardown_from_hook(HookSource::Signal(15)));
        assert!(!session.core.teardown_from_hook(HookSource::AtExit));
        session.end().unwrap();
        assert_eq!(buf.count(SESSION_EXIT), 1);
        assert_eq!(session.state(), SessionState::Terminated);
    }

    #[test]
    fn test_panic_path_skips_busy_device() {
        let buf = SharedBuf::default();
        let session = active(&buf, None);
        {
            let _held = session.core.device.lock().unwrap();
            assert!(session.core.teardown_from_hook(HookSource::Panic));
        }
        // Terminated even though the screen could not be restored.
        assert_eq!(session.state(), SessionState::Terminated);
        assert_eq!(buf.count(SESSION_EXIT), 0);
    }

    #[test]
    fn test_signal_path_gives_up_on_stalled_device() {
        let buf = SharedBuf::default();
        let session = active(&buf, None);
        let started = Instant::now();
        {
            // Another writer stuck mid-frame holds the device.
            let _held = session.core.device.lock().unwrap();
            assert!(session.core.teardown_from_hook(HookSource::Signal(15)));
        }
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(session.state(), SessionState::Terminated);
        assert_eq!(buf.count(SESSION_EXIT), 0);
    }

    #[test]
    fn test_signal_path_waits_for_short_write() {
        let buf = SharedBuf::default();
        let session = active(&buf, None);
        let core = Arc::clone(&session.core);
        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let writer = thread::spawn(move || {
            let _held = core.device.lock().unwrap();
            locked_tx.send(()).unwrap();
            thread::sleep(Duration::from_millis(20));
        });
        locked_rx.recv().unwrap();
        assert!(session.core.teardown_from_hook(HookSource::Signal(15)));
        writer.join().unwrap();
        assert_eq!(buf.count(SESSION_EXIT), 1);
    }

    // ============================================
    // Frames
    // ============================================

    #[test]
    fn test_write_frame_only_while_active() {
        let buf = SharedBuf::default();
        let mut session = Session::new(buf.clone());
        assert!(!session.write_frame(b"early").unwrap());

        session.enter(None, false, ExitHooks::empty()).unwrap();
        assert!(session.write_frame(b"frame").unwrap());

        session.end().unwrap();
        assert!(!session.write_frame(b"late").unwrap());

        assert_eq!(buf.count("early"), 0);
        assert_eq!(buf.count("frame"), 1);
        assert_eq!(buf.count("late"), 0);
    }

    // ============================================
    // Failures
    // ============================================

    #[test]
    fn test_enter_failure_terminates() {
        let budget = Arc::new(AtomicUsize::new(0));
        let mut session = Session::new(Failing {
            budget: Arc::clone(&budget),
        });
        assert!(session.enter(None, false, ExitHooks::empty()).is_err());
        assert_eq!(session.state(), SessionState::Terminated);
    }

    #[test]
    fn test_end_reports_write_failure_once() {
        let budget = Arc::new(AtomicUsize::new(1));
        let mut session = Session::new(Failing {
            budget: Arc::clone(&budget),
        });
        session.enter(None, false, ExitHooks::empty()).unwrap();
        assert!(session.end().is_err());
        assert!(session.end().is_ok());
        assert_eq!(session.state(), SessionState::Terminated);
    }
}
