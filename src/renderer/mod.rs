//! Differential tile renderer.
//!
//! This module provides [`Renderer`], the main entry point. It keeps a
//! [`TileCache`] of what the terminal currently shows and, on every
//! [`present`](Renderer::present), writes only the tiles that differ from
//! it.
//!
//! # Examples
//!
//! ```no_run
//! use termtile::{Console, Renderer, Rgb, Tile};
//!
//! fn main() -> termtile::Result<()> {
//!     // Enters the alternate screen and hides the cursor.
//!     let mut renderer = Renderer::new(Some("tiles"))?;
//!     let mut console = Console::new(80, 24);
//!
//!     console.print(10, 5, "Hello!", Rgb::GREEN, Rgb::BLACK);
//!     renderer.present(&console)?;
//!
//!     // Only the changed tile is written this time.
//!     console.set(10, 5, Tile::new('J', Rgb::GREEN, Rgb::BLACK));
//!     renderer.present(&console)?;
//!
//!     renderer.close()
//! }
//! ```
//!
//! # Terminal Cleanup
//!
//! Dropping the renderer restores the terminal. By default the session is
//! also registered with the process exit hooks, so the terminal is restored
//! on `std::process::exit`, panics and termination signals.

mod cache;
mod diff;

pub use cache::TileCache;
pub use diff::{FrameDiff, encode_frame};

use crate::console::Console;
use crate::error::{self, Result};
use crate::event::{LogLevel, emit_log};
use crate::terminal::{ExitHooks, Session, SessionState};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

/// Default scratch buffer size in bytes.
pub const DEFAULT_CAPACITY: usize = 16 * 1024;

/// Renderer configuration options.
///
/// These options control terminal setup behavior when creating a [`Renderer`].
#[derive(Clone, Debug)]
pub struct RendererOptions {
    /// Window title, set once at startup.
    pub title: Option<String>,
    /// Capture the terminal mode and switch to raw mode.
    pub raw_mode: bool,
    /// Process exit facilities that restore the terminal.
    pub exit_hooks: ExitHooks,
    /// Initial size of the frame assembly buffer.
    pub initial_capacity: usize,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            title: None,
            raw_mode: true,
            exit_hooks: ExitHooks::all(),
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Presentation statistics.
#[derive(Clone, Debug, Default)]
pub struct PresentStats {
    pub frames: u64,
    pub last_frame_time: Duration,
    pub last_changed_tiles: usize,
    pub last_bytes: usize,
    pub total_bytes: u64,
    pub fps: f32,
}

/// Terminal tile renderer.
///
/// Owns the tile cache and the terminal [`Session`]. Not meant to be shared:
/// call [`present`](Self::present) from one thread at a time, and keep at
/// most one renderer per terminal.
pub struct Renderer<W: Write + Send + 'static = Stdout> {
    cache: TileCache,
    session: Session<W>,
    scratch_buffer: Vec<u8>,
    stats: PresentStats,
    last_present_at: Instant,
}

impl Renderer<Stdout> {
    /// Start a session on stdout with default options and an optional
    /// window title.
    pub fn new(title: Option<&str>) -> Result<Self> {
        let options = RendererOptions {
            title: title.map(str::to_owned),
            ..RendererOptions::default()
        };
        Self::with_options(io::stdout(), options)
    }
}

impl<W: Write + Send + 'static> Renderer<W> {
    /// Start a session on `device`.
    ///
    /// Fails with [`Error::AllocationFailure`](crate::Error::AllocationFailure)
    /// when the frame buffer cannot be reserved, or with an I/O error when
    /// the setup sequence cannot be written. No session is left behind in
    /// either case.
    pub fn with_options(device: W, options: RendererOptions) -> Result<Self> {
        let mut scratch_buffer = Vec::new();
        error::try_reserve(&mut scratch_buffer, options.initial_capacity, "output buffer")?;

        let mut session = Session::new(device);
        session.enter(options.title.as_deref(), options.raw_mode, options.exit_hooks)?;

        Ok(Self {
            cache: TileCache::new(),
            session,
            scratch_buffer,
            stats: PresentStats::default(),
            last_present_at: Instant::now(),
        })
    }

    /// Draw `frame`, writing only what changed since the last present.
    ///
    /// A frame whose dimensions differ from the previous one is drawn in
    /// full. When the session has already been terminated (for instance by
    /// an exit hook) the frame is dropped and an empty diff is returned.
    ///
    /// A failed device write is returned as [`Error::Io`](crate::Error::Io)
    /// and the cache is invalidated, so the next present repaints everything.
    pub fn present(&mut self, frame: &Console) -> Result<FrameDiff> {
        if self.session.state() != SessionState::Active {
            emit_log(LogLevel::Debug, "present on inactive session ignored");
            return Ok(FrameDiff::default());
        }

        self.scratch_buffer.clear();
        let diff = match encode_frame(&mut self.cache, frame, &mut self.scratch_buffer) {
            Ok(diff) => diff,
            Err(e) => {
                self.cache.invalidate();
                return Err(e);
            }
        };

        self.write_encoded(diff)
    }

    /// Write the assembled frame; stats count only frames that reached the
    /// device.
    fn write_encoded(&mut self, diff: FrameDiff) -> Result<FrameDiff> {
        match self.session.write_frame(&self.scratch_buffer) {
            Ok(true) => {
                self.update_stats(&diff);
                Ok(diff)
            }
            // Terminated by an exit hook since the check above.
            Ok(false) => Ok(FrameDiff::default()),
            Err(e) => {
                // The cache already holds this frame but the terminal may not.
                self.cache.invalidate();
                emit_log(LogLevel::Warn, &format!("frame write failed: {e}"));
                Err(e)
            }
        }
    }

    /// Force the next present to repaint every tile.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Get presentation stats.
    #[must_use]
    pub fn stats(&self) -> &PresentStats {
        &self.stats
    }

    /// Session lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// What the renderer believes the terminal shows.
    #[must_use]
    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    /// End the session and restore the terminal.
    ///
    /// Dropping the renderer does the same but discards errors. Teardown
    /// that already happened through an exit hook is not repeated.
    pub fn close(mut self) -> Result<()> {
        self.session.end()
    }

    fn update_stats(&mut self, diff: &FrameDiff) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_present_at);
        self.last_present_at = now;

        let bytes = self.scratch_buffer.len();
        self.stats.frames = self.stats.frames.saturating_add(1);
        self.stats.last_frame_time = frame_time;
        self.stats.last_changed_tiles = diff.changed_tiles;
        self.stats.last_bytes = bytes;
        self.stats.total_bytes = self.stats.total_bytes.saturating_add(bytes as u64);
        self.stats.fps = if frame_time.as_secs_f32() > 0.0 {
            1.0 / frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl<W: Write + Send + 'static> std::fmt::Debug for Renderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("session", &self.session)
            .field("cache_size", &self.cache.size())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
