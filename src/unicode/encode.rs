//! Scalar value to UTF-8 byte encoding.
//!
//! Tile characters are raw integers, so this cannot go through `char`: every
//! `i32` must map to some printable byte sequence. Values in
//! `0..=0x10FFFF` get the standard variable-length encoding (surrogates
//! included, encoded by bit layout alone); anything else becomes a single
//! [`REPLACEMENT`] byte.

use std::io::{self, Write};

/// Largest scalar value that gets a multi-byte encoding.
pub const MAX_CODEPOINT: i32 = 0x10_FFFF;

/// Byte written for values outside `0..=MAX_CODEPOINT`.
pub const REPLACEMENT: u8 = b'?';

const CONT: u8 = 0b1000_0000;
const CONT_MASK: u32 = 0b0011_1111;

/// Encoded form of one scalar value: 1 to 4 bytes stored inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedChar {
    bytes: [u8; 4],
    len: u8,
}

impl EncodedChar {
    #[inline]
    const fn one(b0: u8) -> Self {
        Self {
            bytes: [b0, 0, 0, 0],
            len: 1,
        }
    }

    /// The encoded bytes. Never empty.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Encoded length in bytes (1 to 4).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl AsRef<[u8]> for EncodedChar {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Encode one scalar value.
///
/// Out-of-range input (negative or above [`MAX_CODEPOINT`]) yields the
/// single byte [`REPLACEMENT`]; this never fails.
#[must_use]
pub const fn encode_codepoint(value: i32) -> EncodedChar {
    let v = value as u32;
    match value {
        0..=0x7F => EncodedChar::one(v as u8),
        0x80..=0x7FF => EncodedChar {
            bytes: [0b1100_0000 | (v >> 6) as u8, CONT | (v & CONT_MASK) as u8, 0, 0],
            len: 2,
        },
        0x800..=0xFFFF => EncodedChar {
            bytes: [
                0b1110_0000 | (v >> 12) as u8,
                CONT | ((v >> 6) & CONT_MASK) as u8,
                CONT | (v & CONT_MASK) as u8,
                0,
            ],
            len: 3,
        },
        0x1_0000..=MAX_CODEPOINT => EncodedChar {
            bytes: [
                0b1111_0000 | (v >> 18) as u8,
                CONT | ((v >> 12) & CONT_MASK) as u8,
                CONT | ((v >> 6) & CONT_MASK) as u8,
                CONT | (v & CONT_MASK) as u8,
            ],
            len: 4,
        },
        _ => EncodedChar::one(REPLACEMENT),
    }
}

/// Encode `value` and write it to `w`.
#[inline]
pub fn write_codepoint(w: &mut impl Write, value: i32) -> io::Result<()> {
    w.write_all(encode_codepoint(value).as_bytes())
}
