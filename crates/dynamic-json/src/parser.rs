//! JSON text → value tree.
//!
//! A strict recursive-descent parser over UTF-8 text. The lexical JSON type of
//! each value decides its [`Kind`](crate::Kind):
//!
//! - `{...}` → Object (duplicate keys: the last occurrence wins, first position kept)
//! - `[...]` → Array
//! - `"..."` → String, after escape decoding
//! - number literals → Number (`f64`)
//! - `true`/`false` → Boolean, `null` → Null
//!
//! Comments, trailing commas, `NaN`/`Infinity` and trailing content are
//! rejected. Byte input is decoded first (see [`crate::encoding`]).

use std::io::Read;

use encoding_rs::Encoding;

use crate::encoding;
use crate::error::{JsonError, Result};
use crate::node::{Kind, Node, Object};

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed object/array nesting. Exceeding it is a parse error.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

/// Parse JSON text into a value tree. Top-level scalars are accepted.
pub fn parse(text: &str) -> Result<Node> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parse JSON text with explicit options.
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Node> {
    tracing::trace!(len = text.len(), "parsing JSON text");
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut parser = Parser::new(text, options.max_depth);
    let result = parser.parse_document();
    if let Err(ref e) = result {
        tracing::debug!(error = %e, "JSON parse failed");
    }
    result
}

/// Parse JSON text whose top level must be an object or an array.
/// A well-formed top-level scalar fails with `TypeMismatch`.
pub fn parse_container(text: &str) -> Result<Node> {
    let node = parse(text)?;
    if node.is_object() || node.is_array() {
        Ok(node)
    } else {
        Err(JsonError::TypeMismatch {
            expected: Kind::Object,
            found: node.kind(),
        })
    }
}

/// Parse JSON bytes in the declared encoding, or a detected one when `None`.
pub fn parse_bytes(bytes: &[u8], encoding: Option<&'static Encoding>) -> Result<Node> {
    let text = encoding::decode(bytes, encoding)?;
    parse(&text)
}

/// Read a whole byte stream and parse it. The stream is read to its end
/// before parsing starts.
pub fn parse_reader<R: Read>(mut reader: R, encoding: Option<&'static Encoding>) -> Result<Node> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| JsonError::Encoding(format!("failed to read input stream: {e}")))?;
    parse_bytes(&buf, encoding)
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, max_depth: usize) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    fn parse_document(&mut self) -> Result<Node> {
        self.skip_whitespace();
        let node = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.bytes.len() {
            return Err(self.error("trailing content after JSON value"));
        }
        Ok(node)
    }

    /// Build a parse error at the current position. Line and column are
    /// computed lazily since errors are the cold path.
    fn error(&self, message: impl Into<String>) -> JsonError {
        let consumed = &self.src[..self.floor_char_boundary(self.pos)];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = consumed[line_start..].chars().count() + 1;
        JsonError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    fn floor_char_boundary(&self, mut i: usize) -> usize {
        i = i.min(self.src.len());
        while !self.src.is_char_boundary(i) {
            i -= 1;
        }
        i
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.error(format!(
                "expected '{}', found {}",
                expected as char,
                self.describe_current()
            ))),
            None => Err(self.error(format!(
                "expected '{}', found end of input",
                expected as char
            ))),
        }
    }

    fn describe_current(&self) -> String {
        match self.src[self.floor_char_boundary(self.pos)..].chars().next() {
            Some(c) => format!("'{}'", c.escape_default()),
            None => "end of input".to_string(),
        }
    }

    fn parse_value(&mut self) -> Result<Node> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Ok(Node::String(self.parse_string()?)),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b't') => self.parse_literal("true", Node::Boolean(true)),
            Some(b'f') => self.parse_literal("false", Node::Boolean(false)),
            Some(b'n') => self.parse_literal("null", Node::Null),
            Some(_) => Err(self.error(format!("unexpected {}", self.describe_current()))),
        }
    }

    fn parse_literal(&mut self, word: &str, node: Node) -> Result<Node> {
        if self.bytes[self.pos..].starts_with(word.as_bytes()) {
            self.pos += word.len();
            Ok(node)
        } else {
            Err(self.error(format!("invalid literal, expected '{word}'")))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(format!(
                "nesting deeper than {} levels",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Node> {
        self.enter()?;
        self.pos += 1; // '{'
        let mut object = Object::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Node::Object(object));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.error(format!(
                    "expected property name, found {}",
                    self.describe_current()
                )));
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect_byte(b':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            object.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("unterminated object")),
                Some(_) => {
                    return Err(self.error(format!(
                        "expected ',' or '}}', found {}",
                        self.describe_current()
                    )))
                }
            }
        }
        self.depth -= 1;
        Ok(Node::Object(object))
    }

    fn parse_array(&mut self) -> Result<Node> {
        self.enter()?;
        self.pos += 1; // '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Node::Array(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("unterminated array")),
                Some(_) => {
                    return Err(self.error(format!(
                        "expected ',' or ']', found {}",
                        self.describe_current()
                    )))
                }
            }
        }
        self.depth -= 1;
        Ok(Node::Array(items))
    }

    /// Parse a string literal starting at the opening quote.
    ///
    /// Unescaped runs are copied as slices; the source is valid UTF-8 and runs
    /// only ever end at ASCII bytes, so slicing stays on char boundaries.
    fn parse_string(&mut self) -> Result<String> {
        self.pos += 1; // opening quote
        let mut out = String::new();
        let mut run_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(b'"') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                    run_start = self.pos;
                }
                Some(b) if b < 0x20 => {
                    return Err(self.error("unescaped control character in string"));
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        let Some(b) = self.peek() else {
            return Err(self.error("unterminated escape sequence"));
        };
        self.pos += 1;
        match b {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let unit = self.parse_hex4()?;
                out.push(self.decode_utf16_escape(unit)?);
            }
            _ => {
                self.pos -= 1;
                return Err(self.error(format!(
                    "invalid escape sequence '\\{}'",
                    self.describe_current().trim_matches('\'')
                )));
            }
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u16> {
        let end = self.pos + 4;
        let bytes = self.bytes;
        let digits = bytes
            .get(self.pos..end)
            .filter(|d| d.iter().all(u8::is_ascii_hexdigit))
            .ok_or_else(|| self.error("invalid \\u escape, expected four hex digits"))?;
        // Checked above: four ASCII hex digits.
        let text = std::str::from_utf8(digits).unwrap_or("0");
        let unit = u16::from_str_radix(text, 16).unwrap_or(0);
        self.pos = end;
        Ok(unit)
    }

    /// Combine a `\uXXXX` unit with a following low-surrogate escape when
    /// needed. Unpaired surrogates are an encoding error, not replaced.
    fn decode_utf16_escape(&mut self, unit: u16) -> Result<char> {
        match unit {
            0xD800..=0xDBFF => {
                if !self.bytes[self.pos..].starts_with(b"\\u") {
                    return Err(JsonError::Encoding(format!(
                        "unpaired high surrogate \\u{unit:04X}"
                    )));
                }
                self.pos += 2;
                let low = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(JsonError::Encoding(format!(
                        "high surrogate \\u{unit:04X} followed by \\u{low:04X}"
                    )));
                }
                let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(code).ok_or_else(|| {
                    JsonError::Encoding(format!("invalid code point U+{code:X}"))
                })
            }
            0xDC00..=0xDFFF => Err(JsonError::Encoding(format!(
                "unpaired low surrogate \\u{unit:04X}"
            ))),
            _ => char::from_u32(u32::from(unit))
                .ok_or_else(|| JsonError::Encoding(format!("invalid code point U+{unit:04X}"))),
        }
    }

    fn parse_number(&mut self) -> Result<Node> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(self.error("leading zeros are not allowed"));
                }
            }
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.error("invalid number, expected digit")),
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("invalid number, expected digit after '.'"));
            }
            self.skip_digits();
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("invalid number, expected exponent digits"));
            }
            self.skip_digits();
        }
        let literal = &self.src[start..self.pos];
        match literal.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Node::Number(n)),
            _ => {
                self.pos = start;
                Err(self.error(format!(
                    "number {literal} is outside the double-precision range"
                )))
            }
        }
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }
}
