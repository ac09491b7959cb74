//! Unicode scalar value encoding for terminal output.

mod encode;

pub use encode::{EncodedChar, MAX_CODEPOINT, REPLACEMENT, encode_codepoint, write_codepoint};
