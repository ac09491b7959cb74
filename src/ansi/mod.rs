//! ANSI escape sequence generation.
//!
//! Writers emit straight into any [`Write`] without going through the
//! formatting machinery; the renderer calls them once per changed tile.

pub mod sequences;

pub use sequences::*;

use crate::color::Rgb;
use std::io::{self, Write};

/// Write a u8 as decimal digits to a writer without formatting overhead.
#[inline]
fn write_u8_decimal(w: &mut impl Write, n: u8) -> io::Result<()> {
    if n >= 100 {
        w.write_all(&[b'0' + n / 100, b'0' + (n / 10) % 10, b'0' + n % 10])
    } else if n >= 10 {
        w.write_all(&[b'0' + n / 10, b'0' + n % 10])
    } else {
        w.write_all(&[b'0' + n])
    }
}

/// Write a u32 as decimal digits to a writer without formatting overhead.
///
/// Stack buffer is sized for max u32 digits (10) to avoid heap allocation.
#[inline]
fn write_u32_decimal(w: &mut impl Write, n: u32) -> io::Result<()> {
    // Fast paths for common small values (most cursor positions)
    if n < 10 {
        return w.write_all(&[b'0' + n as u8]);
    }
    if n < 100 {
        return w.write_all(&[b'0' + (n / 10) as u8, b'0' + (n % 10) as u8]);
    }

    let mut buf = [0u8; 10];
    let mut i = buf.len();
    let mut val = n;
    while val > 0 {
        i -= 1;
        buf[i] = b'0' + (val % 10) as u8;
        val /= 10;
    }
    w.write_all(&buf[i..])
}

#[inline]
fn write_rgb_params(w: &mut impl Write, color: Rgb) -> io::Result<()> {
    write_u8_decimal(w, color.r)?;
    w.write_all(b";")?;
    write_u8_decimal(w, color.g)?;
    w.write_all(b";")?;
    write_u8_decimal(w, color.b)
}

/// Write one SGR sequence setting truecolor foreground and background:
/// `ESC[38;2;R;G;B;48;2;R;G;Bm`.
pub fn write_colors(w: &mut impl Write, fg: Rgb, bg: Rgb) -> io::Result<()> {
    w.write_all(b"\x1b[38;2;")?;
    write_rgb_params(w, fg)?;
    w.write_all(b";48;2;")?;
    write_rgb_params(w, bg)?;
    w.write_all(b"m")
}

/// Generate the combined color sequence.
#[must_use]
pub fn colors(fg: Rgb, bg: Rgb) -> String {
    let mut buf = Vec::with_capacity(40);
    let _ = write_colors(&mut buf, fg, bg);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write cursor position sequence (0-indexed in, 1-indexed on the wire).
pub fn write_cursor_position(w: &mut impl Write, row: u32, col: u32) -> io::Result<()> {
    w.write_all(b"\x1b[")?;
    write_u32_decimal(w, row.saturating_add(1))?;
    w.write_all(b";")?;
    write_u32_decimal(w, col.saturating_add(1))?;
    w.write_all(b"H")
}

/// Generate cursor position sequence (0-indexed).
#[must_use]
pub fn cursor_position(row: u32, col: u32) -> String {
    let mut buf = Vec::with_capacity(16);
    let _ = write_cursor_position(&mut buf, row, col);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write a cursor-forward sequence `ESC[nC`. Writes nothing for `n == 0`.
pub fn write_cursor_forward(w: &mut impl Write, n: u32) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    w.write_all(b"\x1b[")?;
    write_u32_decimal(w, n)?;
    w.write_all(b"C")
}

/// Generate a cursor-forward sequence.
#[must_use]
pub fn cursor_forward(n: u32) -> String {
    let mut buf = Vec::with_capacity(8);
    let _ = write_cursor_forward(&mut buf, n);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write an OSC 0 window title sequence.
///
/// Control characters are dropped from the title so it cannot terminate the
/// OSC string early and smuggle in further sequences.
pub fn write_title(w: &mut impl Write, title: &str) -> io::Result<()> {
    w.write_all(TITLE_PREFIX.as_bytes())?;
    if title.chars().any(char::is_control) {
        let clean: String = title.chars().filter(|c| !c.is_control()).collect();
        w.write_all(clean.as_bytes())?;
    } else {
        w.write_all(title.as_bytes())?;
    }
    w.write_all(TITLE_SUFFIX.as_bytes())
}
