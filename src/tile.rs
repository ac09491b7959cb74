//! Console tile: one character position with foreground and background.
//!
//! The character is stored as a raw `i32` scalar value rather than a `char`.
//! Consoles are filled by upstream drawing code that may write arbitrary
//! integers, and the renderer's cache uses the out-of-range value
//! [`Tile::NEVER_DRAWN_CH`] to mark positions it has not painted yet.
//!
//! # Examples
//!
//! ```
//! use termtile::{Rgb, Tile};
//!
//! let wall = Tile::new('#', Rgb::GRAY, Rgb::BLACK);
//! assert_eq!(wall.char(), Some('#'));
//! assert_ne!(wall, Tile::NEVER_DRAWN);
//! ```

use crate::color::Rgb;

/// A single console tile.
///
/// Equality is structural over the character and both color triples, which
/// is exactly the comparison the renderer uses to decide whether a position
/// must be repainted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Character scalar value. Not necessarily a valid code point.
    pub ch: i32,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Tile {
    /// Character value marking a cache position that was never drawn.
    pub const NEVER_DRAWN_CH: i32 = -1;

    /// Cache fill value; compares unequal to every tile a console can hold
    /// with a valid character.
    pub const NEVER_DRAWN: Self = Self {
        ch: Self::NEVER_DRAWN_CH,
        fg: Rgb::BLACK,
        bg: Rgb::BLACK,
    };

    /// Blank tile: a space, white on black.
    pub const BLANK: Self = Self {
        ch: b' ' as i32,
        fg: Rgb::WHITE,
        bg: Rgb::BLACK,
    };

    /// Create a tile from a `char`.
    #[must_use]
    pub const fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self {
            ch: ch as i32,
            fg,
            bg,
        }
    }

    /// Create a tile from a raw scalar value.
    #[must_use]
    pub const fn from_raw(ch: i32, fg: Rgb, bg: Rgb) -> Self {
        Self { ch, fg, bg }
    }

    /// Character as a `char`, if the scalar value is a valid one.
    #[must_use]
    pub fn char(self) -> Option<char> {
        u32::try_from(self.ch).ok().and_then(char::from_u32)
    }

    /// Whether this tile carries the never-drawn marker.
    #[must_use]
    pub const fn is_never_drawn(self) -> bool {
        self.ch == Self::NEVER_DRAWN_CH
    }

    /// Same tile with a different character.
    #[must_use]
    pub const fn with_char(self, ch: char) -> Self {
        Self {
            ch: ch as i32,
            ..self
        }
    }

    /// Same tile with a different foreground.
    #[must_use]
    pub const fn with_fg(self, fg: Rgb) -> Self {
        Self { fg, ..self }
    }

    /// Same tile with a different background.
    #[must_use]
    pub const fn with_bg(self, bg: Rgb) -> Self {
        Self { bg, ..self }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::BLANK
    }
}
