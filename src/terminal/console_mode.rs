//! Windows console mode handling.
//!
//! Captures the input and output console modes plus the output code page,
//! switches the console to virtual terminal processing with UTF-8 output,
//! and writes the captured values back exactly once.

#![allow(unsafe_code)]

use std::io;
use windows_sys::Win32::Foundation::{BOOL, HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::Globalization::CP_UTF8;
use windows_sys::Win32::System::Console::{
    CONSOLE_MODE, DISABLE_NEWLINE_AUTO_RETURN, ENABLE_PROCESSED_OUTPUT,
    ENABLE_VIRTUAL_TERMINAL_INPUT, ENABLE_VIRTUAL_TERMINAL_PROCESSING, GetConsoleMode,
    GetConsoleOutputCP, GetStdHandle, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE, SetConsoleMode,
    SetConsoleOutputCP,
};

/// Captured console state for restoration.
#[derive(Debug)]
pub struct ConsoleModeGuard {
    stdin: HANDLE,
    stdout: HANDLE,
    stdin_mode: CONSOLE_MODE,
    stdout_mode: CONSOLE_MODE,
    output_cp: u32,
    restored: bool,
}

// SAFETY: the standard handles are process-wide and valid from any thread.
unsafe impl Send for ConsoleModeGuard {}

fn check(ok: BOOL) -> io::Result<()> {
    if ok == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

fn std_handle(which: u32) -> io::Result<HANDLE> {
    // SAFETY: GetStdHandle has no preconditions.
    let handle = unsafe { GetStdHandle(which) };
    if handle == INVALID_HANDLE_VALUE || handle.is_null() {
        Err(io::Error::last_os_error())
    } else {
        Ok(handle)
    }
}

impl ConsoleModeGuard {
    /// Capture the current console modes and switch to VT mode.
    ///
    /// Fails when the standard handles are not consoles (redirected output).
    pub fn new() -> io::Result<Self> {
        let stdin = std_handle(STD_INPUT_HANDLE)?;
        let stdout = std_handle(STD_OUTPUT_HANDLE)?;

        let mut stdin_mode: CONSOLE_MODE = 0;
        let mut stdout_mode: CONSOLE_MODE = 0;
        // SAFETY: valid handles and out-pointers to initialized locals.
        unsafe {
            check(GetConsoleMode(stdin, &mut stdin_mode))?;
            check(GetConsoleMode(stdout, &mut stdout_mode))?;
        }
        // SAFETY: no preconditions.
        let output_cp = unsafe { GetConsoleOutputCP() };

        let guard = Self {
            stdin,
            stdout,
            stdin_mode,
            stdout_mode,
            output_cp,
            restored: false,
        };

        // SAFETY: valid console handles.
        unsafe {
            check(SetConsoleMode(stdin, ENABLE_VIRTUAL_TERMINAL_INPUT))?;
            check(SetConsoleMode(
                stdout,
                ENABLE_PROCESSED_OUTPUT
                    | ENABLE_VIRTUAL_TERMINAL_PROCESSING
                    | DISABLE_NEWLINE_AUTO_RETURN,
            ))?;
            check(SetConsoleOutputCP(CP_UTF8))?;
        }
        Ok(guard)
    }

    /// Put the captured modes back. Later calls do nothing.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        // Every step runs even if an earlier one fails.
        // SAFETY: handles were valid at capture and stay valid for the process.
        let results = unsafe {
            [
                check(SetConsoleMode(self.stdin, self.stdin_mode)),
                check(SetConsoleMode(self.stdout, self.stdout_mode)),
                check(SetConsoleOutputCP(self.output_cp)),
            ]
        };
        results.into_iter().collect()
    }
}

impl Drop for ConsoleModeGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
