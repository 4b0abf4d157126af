//! Byte-stream decoding ahead of parsing.
//!
//! Resolution order: a byte-order mark always wins; otherwise the declared
//! encoding is used; otherwise the first two bytes are inspected for the
//! null-byte pattern of UTF-16 text (ASCII-only JSON always starts with an
//! ASCII character); otherwise UTF-8. Malformed sequences are reported, never
//! replaced.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{JsonError, Result};

/// Look up an encoding by its WHATWG label (`"utf-8"`, `"utf-16le"`, `"shift_jis"`, ...).
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Pick the encoding for `bytes` and return it with the offset of the payload
/// (past any byte-order mark).
pub fn resolve(bytes: &[u8], declared: Option<&'static Encoding>) -> (&'static Encoding, usize) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return (encoding, bom_len);
    }
    if let Some(encoding) = declared {
        return (encoding, 0);
    }
    match bytes {
        [0, b, ..] if *b != 0 => (UTF_16BE, 0),
        [a, 0, ..] if *a != 0 => (UTF_16LE, 0),
        _ => (UTF_8, 0),
    }
}

/// Decode `bytes` to text, failing with `JsonError::Encoding` on the first
/// malformed sequence.
pub fn decode<'a>(bytes: &'a [u8], declared: Option<&'static Encoding>) -> Result<Cow<'a, str>> {
    let (encoding, offset) = resolve(bytes, declared);
    tracing::trace!(
        encoding = encoding.name(),
        len = bytes.len(),
        "decoding JSON byte input"
    );
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[offset..])
        .ok_or_else(|| {
            JsonError::Encoding(format!("malformed {} byte sequence", encoding.name()))
        })
}
