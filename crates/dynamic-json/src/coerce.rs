//! Scalar coercion table used by the type mapper.
//!
//! | target  | Boolean          | Number                    | String                      |
//! |---------|------------------|---------------------------|-----------------------------|
//! | bool    | as is            | non-zero → true           | `true`/`false`, any case    |
//! | integer | 1 / 0            | integral and in range     | parsed integer or integral number |
//! | float   | 1.0 / 0.0        | as is (`f32` if in range) | parsed number               |
//! | text    | `true`/`false`   | canonical number text     | as is                       |
//!
//! Null and containers never coerce to a scalar.

use std::borrow::Cow;

use crate::error::{JsonError, Result};
use crate::node::Node;
use crate::serializer::format_number;

fn mismatch(node: &Node, target: &str) -> JsonError {
    let shown = match node {
        Node::String(s) => format!("string {s:?}"),
        Node::Number(n) => format!("number {}", format_number(*n)),
        Node::Boolean(b) => format!("boolean {b}"),
        other => other.kind().to_string(),
    };
    JsonError::SchemaMismatch(format!("cannot convert {shown} to {target}"))
}

pub(crate) fn to_bool(node: &Node) -> Result<bool> {
    match node {
        Node::Boolean(b) => Ok(*b),
        Node::Number(n) => Ok(*n != 0.0),
        Node::String(s) => match s.trim() {
            t if t.eq_ignore_ascii_case("true") => Ok(true),
            t if t.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(mismatch(node, "bool")),
        },
        _ => Err(mismatch(node, "bool")),
    }
}

pub(crate) fn to_f64(node: &Node) -> Result<f64> {
    match node {
        Node::Number(n) => Ok(*n),
        Node::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Node::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| mismatch(node, "f64")),
        _ => Err(mismatch(node, "f64")),
    }
}

pub(crate) fn to_f32(node: &Node) -> Result<f32> {
    let n = to_f64(node).map_err(|_| mismatch(node, "f32"))?;
    if n.abs() > f64::from(f32::MAX) {
        return Err(mismatch(node, "f32"));
    }
    Ok(n as f32)
}

/// Integer targets go through `i128` so every primitive width shares one
/// range check.
pub(crate) fn to_integer<T: TryFrom<i128>>(node: &Node, target: &str) -> Result<T> {
    let wide: i128 = match node {
        Node::Boolean(b) => i128::from(*b),
        Node::Number(n) => integral(*n).ok_or_else(|| mismatch(node, target))?,
        Node::String(s) => {
            let t = s.trim();
            match t.parse::<i128>() {
                Ok(i) => i,
                Err(_) => t
                    .parse::<f64>()
                    .ok()
                    .and_then(integral)
                    .ok_or_else(|| mismatch(node, target))?,
            }
        }
        _ => return Err(mismatch(node, target)),
    };
    T::try_from(wide).map_err(|_| mismatch(node, target))
}

fn integral(n: f64) -> Option<i128> {
    // i128 covers every integral f64 up to ~1.7e38; larger magnitudes fail the
    // target range check anyway.
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1.0e38 {
        Some(n as i128)
    } else {
        None
    }
}

pub(crate) fn to_text<'a>(node: &'a Node) -> Result<Cow<'a, str>> {
    match node {
        Node::String(s) => Ok(Cow::Borrowed(s)),
        Node::Number(n) => Ok(Cow::Owned(format_number(*n))),
        Node::Boolean(b) => Ok(Cow::Borrowed(if *b { "true" } else { "false" })),
        _ => Err(mismatch(node, "string")),
    }
}

pub(crate) fn to_char(node: &Node) -> Result<char> {
    let text = to_text(node).map_err(|_| mismatch(node, "char"))?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(mismatch(node, "char")),
    }
}
