//! Error types for termtile.

use std::fmt;
use std::io;

/// Result type alias for termtile operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for termtile operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from writing to or configuring the terminal device.
    Io(io::Error),
    /// Internal state could not be allocated.
    AllocationFailure { what: &'static str, bytes: usize },
    /// Console dimensions whose tile count does not fit in memory.
    InvalidDimensions { width: u32, height: u32 },
    /// Invalid color format (e.g., malformed hex string).
    InvalidColor(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::AllocationFailure { what, bytes } => {
                write!(f, "could not allocate memory for {what} ({bytes} bytes)")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions: {width}x{height}")
            }
            Self::InvalidColor(s) => write!(f, "invalid color format: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Reserve `additional` elements in `vec`, mapping failure to
/// [`Error::AllocationFailure`].
pub(crate) fn try_reserve<T>(vec: &mut Vec<T>, additional: usize, what: &'static str) -> Result<()> {
    vec.try_reserve_exact(additional)
        .map_err(|_| Error::AllocationFailure {
            what,
            bytes: additional.saturating_mul(std::mem::size_of::<T>()),
        })
}
