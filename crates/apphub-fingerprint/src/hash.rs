//! Fingerprint hasher.
//!
//! The recurrence is `acc = acc * 31 + c` over UTF-16 code units with 32-bit
//! two's-complement wrapping, the same function the identity server and
//! previously issued fingerprints were computed with. It must not change.

use alloc::format;
use alloc::string::String;

/// Hash `text` into a lowercase hex string.
///
/// Returns `"0"` for the empty string. Otherwise the absolute value of the
/// final accumulator is rendered in hex, so the output never carries a sign;
/// `i32::MIN` renders as `80000000`.
pub fn simple_hash(text: &str) -> String {
    if text.is_empty() {
        return String::from("0");
    }

    let mut acc: i32 = 0;
    for unit in text.encode_utf16() {
        acc = acc
            .wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit));
    }

    format!("{:x}", acc.unsigned_abs())
}
