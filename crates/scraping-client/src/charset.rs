//! Response body charset handling.
//!
//! The charset comes from the `Content-Type` header. `windows-31j` is treated
//! as `shift_jis` and a missing charset means UTF-8. A byte-order mark in the
//! body overrides the header.

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Result, ScrapeError};

/// Extract the `charset` parameter from a `Content-Type` value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_ascii_lowercase())
    })
}

/// Resolve a charset label; `None` selects UTF-8.
pub fn encoding_for_charset(charset: Option<&str>) -> Result<&'static Encoding> {
    let Some(label) = charset else {
        return Ok(UTF_8);
    };
    let label = label.trim();
    if label.eq_ignore_ascii_case("windows-31j") {
        return Ok(encoding_rs::SHIFT_JIS);
    }
    if label.eq_ignore_ascii_case("utf8") {
        return Ok(UTF_8);
    }
    Encoding::for_label(label.as_bytes()).ok_or_else(|| ScrapeError::Charset(label.to_string()))
}

/// Decode a body to text. Malformed sequences are replaced with U+FFFD and
/// logged; scraped pages are often slightly broken and still useful.
pub fn decode_text(bytes: &[u8], charset: Option<&str>) -> Result<String> {
    let encoding = encoding_for_charset(charset)?;
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            encoding = used.name(),
            "response body contained malformed byte sequences; replaced"
        );
    }
    Ok(text.into_owned())
}
