//! Tile console: the frame handed to [`Renderer::present`](crate::Renderer::present).
//!
//! A row-major grid of [`Tile`]s addressed by `(x, y)`, `x` varying fastest.
//! Drawing here is deliberately small: tiles are set one at a time or as
//! text runs. Richer drawing primitives live with the caller.

use crate::color::Rgb;
use crate::error::{self, Error, Result};
use crate::tile::Tile;

/// A fixed-size grid of tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Console {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Console {
    /// Create a console filled with [`Tile::BLANK`].
    ///
    /// # Panics
    ///
    /// Panics if the tile count overflows or cannot be allocated; use
    /// [`Console::try_new`] to handle that case.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        match Self::try_new(width, height) {
            Ok(console) => console,
            Err(e) => panic!("console {width}x{height}: {e}"),
        }
    }

    /// Create a console filled with [`Tile::BLANK`], reporting allocation
    /// failure instead of aborting.
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        Self::try_filled(width, height, Tile::BLANK)
    }

    /// Create a console with every position set to `tile`.
    pub fn try_filled(width: u32, height: u32, tile: Tile) -> Result<Self> {
        let len = tile_count(width, height)?;
        let mut tiles = Vec::new();
        error::try_reserve(&mut tiles, len, "console tiles")?;
        tiles.resize(len, tile);
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Console width in tiles.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Console height in tiles.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Console dimensions as `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// All tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Mutable access to all tiles in row-major order.
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Tiles of row `y`.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[Tile]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.tiles[start..start + self.width as usize])
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Tile at position, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        self.index(x, y).map(|idx| &self.tiles[idx])
    }

    /// Set the tile at a position. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, tile: Tile) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile;
        }
    }

    /// Fill the whole console with one tile.
    pub fn clear(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Fill a rectangle, clipped to the console.
    pub fn fill(&mut self, x: u32, y: u32, width: u32, height: u32, tile: Tile) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.set(col, row, tile);
            }
        }
    }

    /// Write `text` left to right starting at `(x, y)`, one `char` per tile.
    ///
    /// Stops at the right edge. Returns the number of tiles written.
    pub fn print(&mut self, x: u32, y: u32, text: &str, fg: Rgb, bg: Rgb) -> u32 {
        if y >= self.height {
            return 0;
        }
        let mut written = 0;
        for (col, ch) in (x..self.width).zip(text.chars()) {
            self.set(col, y, Tile::new(ch, fg, bg));
            written += 1;
        }
        written
    }
}

/// Number of tiles in a `width` x `height` grid.
pub(crate) fn tile_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(Error::InvalidDimensions { width, height })
}
