//! Frame diffing against the tile cache and escape-stream emission.

use crate::ansi::{self, FRAME_START};
use crate::console::Console;
use crate::error::Result;
use crate::renderer::cache::TileCache;
use crate::unicode::{MAX_CODEPOINT, write_codepoint};
use std::io::Write;

/// Summary of one encoded frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameDiff {
    /// Tiles that differed from the cache and were emitted.
    pub changed_tiles: usize,
    /// Cursor-forward sequences emitted for unchanged runs.
    pub skip_runs: usize,
    /// Whether the cache was reallocated for this frame.
    pub cache_reset: bool,
}

impl FrameDiff {
    /// Check if the frame drew anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_tiles == 0
    }
}

/// Encode `frame` as the escape stream that brings the terminal from the
/// cached state to `frame`, updating the cache as tiles are emitted.
///
/// Output layout: the cursor-hide sequence, then for each row a cursor move
/// to its first column followed by, for each changed tile, an optional
/// cursor-forward over the preceding unchanged run, the truecolor SGR for
/// the tile and its encoded character. Unchanged runs at the end of a row
/// are not flushed since the next row repositions the cursor.
///
/// Row `y` is addressed with the 1-based `ESC [ y+1 ; 1 H`, not libtcod's
/// `ESC [ y ; 0 H`, which puts rows 0 and 1 on the same line.
pub fn encode_frame(
    cache: &mut TileCache,
    frame: &Console,
    out: &mut impl Write,
) -> Result<FrameDiff> {
    let (width, height) = frame.size();
    let mut diff = FrameDiff {
        cache_reset: cache.ensure_size(width, height)?,
        ..FrameDiff::default()
    };

    // The host terminal may show the cursor again on its own (e.g. on
    // window resize), so hide it on every frame.
    out.write_all(FRAME_START.as_bytes())?;

    for y in 0..height {
        ansi::write_cursor_position(out, y, 0)?;

        let Some(row) = frame.row(y) else {
            break;
        };
        let cached = cache.row_mut(y);

        let mut skip: u32 = 0;
        for (tile, prev) in row.iter().zip(cached.iter_mut()) {
            if *tile == *prev {
                skip += 1;
                continue;
            }
            if skip > 0 {
                ansi::write_cursor_forward(out, skip)?;
                diff.skip_runs += 1;
                skip = 0;
            }
            ansi::write_colors(out, tile.fg, tile.bg)?;
            write_codepoint(out, tile.ch & MAX_CODEPOINT)?;
            *prev = *tile;
            diff.changed_tiles += 1;
        }
    }

    Ok(diff)
}
