//! Fuzz target for code point encoding.
//!
//! Every `i32` must encode to 1-4 bytes, and valid scalar values must match
//! the standard library's UTF-8 encoding.

#![no_main]

use libfuzzer_sys::fuzz_target;
use termtile::encode_codepoint;
use termtile::unicode::REPLACEMENT;

fuzz_target!(|value: i32| {
    let encoded = encode_codepoint(value);
    assert!((1..=4).contains(&encoded.len()));

    match u32::try_from(value).ok().and_then(char::from_u32) {
        Some(ch) => {
            let mut buf = [0u8; 4];
            assert_eq!(encoded.as_bytes(), ch.encode_utf8(&mut buf).as_bytes());
        }
        None if !(0xD800..=0xDFFF).contains(&value) => {
            assert_eq!(encoded.as_bytes(), &[REPLACEMENT]);
        }
        None => {}
    }
});
