//! Mock terminal for capturing the renderer's output without a real PTY.
//!
//! [`MockTerminal`] implements `Write` and records every byte. Clones share
//! the same buffer, so a test can hand one clone to the renderer and inspect
//! the output through another.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A mock terminal that captures all output for inspection.
#[derive(Clone)]
pub struct MockTerminal {
    /// Captured output bytes.
    output: Arc<Mutex<Vec<u8>>>,
    /// Whether writes should succeed (for error simulation).
    write_enabled: Arc<AtomicBool>,
    /// Number of successful flushes.
    flushes: Arc<AtomicUsize>,
}

impl Default for MockTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTerminal {
    /// Create a new mock terminal.
    pub fn new() -> Self {
        Self {
            output: Arc::new(Mutex::new(Vec::with_capacity(4096))),
            write_enabled: Arc::new(AtomicBool::new(true)),
            flushes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the captured output.
    pub fn output(&self) -> Vec<u8> {
        self.output.lock().unwrap().clone()
    }

    /// Get the captured output as a string (lossy UTF-8 conversion).
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output()).into_owned()
    }

    /// Take the captured output, leaving the buffer empty.
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *self.output.lock().unwrap())
    }

    /// Clear the captured output buffer.
    pub fn clear_output(&self) {
        self.output.lock().unwrap().clear();
    }

    /// Number of flushes so far.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Disable writes (simulates I/O error).
    pub fn disable_writes(&self) {
        self.write_enabled.store(false, Ordering::SeqCst);
    }

    /// Enable writes.
    pub fn enable_writes(&self) {
        self.write_enabled.store(true, Ordering::SeqCst);
    }

    /// Count occurrences of a specific sequence.
    pub fn count_sequence(&self, seq: &[u8]) -> usize {
        count_sequence(&self.output(), seq)
    }

    /// Check if a specific sequence is present in output.
    pub fn contains_sequence(&self, seq: &[u8]) -> bool {
        self.count_sequence(seq) > 0
    }

    /// Number of colored glyphs (truecolor SGR sequences) in the output.
    pub fn glyph_count(&self) -> usize {
        self.count_sequence(b"\x1b[38;2;")
    }

    fn check_enabled(&self) -> io::Result<()> {
        if self.write_enabled.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "Mock terminal writes disabled",
            ))
        }
    }
}

/// Count occurrences of `seq` in `haystack`.
pub fn count_sequence(haystack: &[u8], seq: &[u8]) -> usize {
    haystack
        .windows(seq.len())
        .filter(|window| *window == seq)
        .count()
}

/// Extract all CSI sequences (ESC [ ... final byte) from `output`.
pub fn extract_csi_sequences(output: &[u8]) -> Vec<Vec<u8>> {
    let mut sequences = Vec::new();
    let mut i = 0;

    while i < output.len() {
        if i + 1 < output.len() && output[i] == 0x1b && output[i + 1] == b'[' {
            let start = i;
            i += 2;
            // Final byte is in 0x40..=0x7E
            while i < output.len() {
                let b = output[i];
                i += 1;
                if (0x40..=0x7E).contains(&b) {
                    sequences.push(output[start..i].to_vec());
                    break;
                }
            }
        } else {
            i += 1;
        }
    }

    sequences
}

impl Write for MockTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_enabled()?;
        self.output.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check_enabled()?;
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl std::fmt::Debug for MockTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTerminal")
            .field("output_len", &self.output.lock().unwrap().len())
            .field("write_enabled", &self.write_enabled.load(Ordering::SeqCst))
            .finish()
    }
}
