//! Shadow copy of what the terminal currently shows.

use crate::console::tile_count;
use crate::error::{self, Result};
use crate::event::{LogLevel, emit_event, emit_log};
use crate::tile::Tile;

/// Tile grid mirroring the last presented frame.
///
/// Starts out unallocated. [`ensure_size`](Self::ensure_size) (re)allocates
/// it filled with [`Tile::NEVER_DRAWN`], so the next present treats every
/// position as changed.
#[derive(Debug, Default)]
pub struct TileCache {
    width: u32,
    height: u32,
    tiles: Option<Vec<Tile>>,
}

impl TileCache {
    /// Create an empty, unallocated cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cache currently holds a grid.
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.tiles.is_some()
    }

    /// Cache dimensions, or `None` before the first allocation.
    #[must_use]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.tiles.as_ref().map(|_| (self.width, self.height))
    }

    /// Make sure the cache is `width` x `height`.
    ///
    /// A missing cache or one of different dimensions is discarded and
    /// replaced with a never-drawn grid. Returns `true` when that happened.
    pub fn ensure_size(&mut self, width: u32, height: u32) -> Result<bool> {
        if self.tiles.is_some() && self.width == width && self.height == height {
            return Ok(false);
        }

        // Release the old grid before allocating the new one.
        self.tiles = None;
        let len = tile_count(width, height)?;
        let mut tiles = Vec::new();
        error::try_reserve(&mut tiles, len, "tile cache")?;
        tiles.resize(len, Tile::NEVER_DRAWN);

        self.width = width;
        self.height = height;
        self.tiles = Some(tiles);

        emit_log(
            LogLevel::Debug,
            &format!("tile cache reallocated to {width}x{height}"),
        );
        emit_event(
            "cache.resize",
            &format!("{{\"width\":{width},\"height\":{height}}}"),
        );
        Ok(true)
    }

    /// Drop the grid so the next [`ensure_size`](Self::ensure_size)
    /// reallocates and the next present repaints everything.
    pub fn invalidate(&mut self) {
        self.tiles = None;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) outside cache");
        y as usize * self.width as usize + x as usize
    }

    /// Cached tile at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the cache is unallocated or the position is out of range.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Tile {
        let idx = self.index(x, y);
        self.tiles.as_ref().expect("tile cache not allocated")[idx]
    }

    /// Record `tile` as drawn at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the cache is unallocated or the position is out of range.
    pub fn set(&mut self, x: u32, y: u32, tile: Tile) {
        let idx = self.index(x, y);
        self.tiles.as_mut().expect("tile cache not allocated")[idx] = tile;
    }

    /// Row `y` of the grid, for the diff engine's row scan.
    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [Tile] {
        let width = self.width as usize;
        let start = y as usize * width;
        let tiles = self.tiles.as_mut().expect("tile cache not allocated");
        &mut tiles[start..start + width]
    }

    /// All cached tiles in row-major order, empty when unallocated.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        self.tiles.as_deref().unwrap_or(&[])
    }
}
