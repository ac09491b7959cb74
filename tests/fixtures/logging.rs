//! Bridge from the renderer's log callback to `tracing`.

use std::sync::{Arc, Mutex};
use termtile::{LogLevel, set_log_callback};
use tracing::Level;

/// Install a fmt subscriber writing to the test output.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

/// Forward renderer log messages to `tracing` and keep a copy of each.
///
/// The callback is process-wide; tests in the same binary share it.
pub fn capture_logs() -> Arc<Mutex<Vec<(LogLevel, String)>>> {
    init_logging();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    set_log_callback(move |level, message| {
        match level {
            LogLevel::Debug => tracing::debug!(target: "termtile", "{message}"),
            LogLevel::Info => tracing::info!(target: "termtile", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "termtile", "{message}"),
            LogLevel::Error => tracing::error!(target: "termtile", "{message}"),
        }
        sink.lock().unwrap().push((level, message.to_string()));
    });
    seen
}
