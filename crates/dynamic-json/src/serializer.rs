//! Value tree → canonical JSON text.
//!
//! Output rules:
//!
//! - objects as `{"k":v,...}` in stored insertion order, arrays as `[v,...]`
//! - Null nodes always render as `null`, wherever they appear
//! - strings escaped per RFC 8259 (`\"`, `\\`, `\b`, `\f`, `\n`, `\r`, `\t`,
//!   other control characters as `\u00XX`); non-ASCII text is emitted as-is
//! - numbers in the shortest decimal form that parses back to the same `f64`,
//!   integral values without a fraction, no exponents, `-0` as `0`
//!
//! Serialization cannot fail: every mutation path goes through typed
//! constructors. The only value a tree can hold that JSON cannot express is a
//! non-finite number, which renders as `null`.

use std::fmt::Write as _;
use std::io;

use crate::node::Node;

/// Render a node as compact canonical JSON.
pub fn to_string(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Render a node as two-space indented JSON. Empty containers stay `{}`/`[]`.
pub fn to_string_pretty(node: &Node) -> String {
    let mut out = String::new();
    write_pretty(node, 0, &mut out);
    out
}

/// Write compact canonical JSON to any byte sink.
pub fn to_writer<W: io::Write>(node: &Node, mut writer: W) -> io::Result<()> {
    writer.write_all(to_string(node).as_bytes())
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Object(object) => {
            out.push('{');
            for (i, (key, value)) in object.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_node(value, out);
            }
            out.push('}');
        }
        Node::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_node(item, out);
            }
            out.push(']');
        }
        scalar => write_scalar(scalar, out),
    }
}

fn write_pretty(node: &Node, depth: usize, out: &mut String) {
    match node {
        Node::Object(object) if !object.is_empty() => {
            out.push('{');
            for (i, (key, value)) in object.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                out.push_str(&make_indent(depth + 1));
                write_string(key, out);
                out.push_str(": ");
                write_pretty(value, depth + 1, out);
            }
            out.push('\n');
            out.push_str(&make_indent(depth));
            out.push('}');
        }
        Node::Array(items) if !items.is_empty() => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                out.push_str(&make_indent(depth + 1));
                write_pretty(item, depth + 1, out);
            }
            out.push('\n');
            out.push_str(&make_indent(depth));
            out.push(']');
        }
        other => write_node(other, out),
    }
}

fn write_scalar(node: &Node, out: &mut String) {
    match node {
        Node::Null => out.push_str("null"),
        Node::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Node::Number(n) => out.push_str(&format_number(*n)),
        Node::String(s) => write_string(s, out),
        Node::Object(_) | Node::Array(_) => write_node(node, out),
    }
}

/// Format a double in round-trippable decimal form.
///
/// `f64`'s `Display` already produces the shortest digits that parse back to
/// the same value and never uses exponent notation.
pub(crate) fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "null".to_string();
    }
    // Normalize -0 to 0
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{n}")
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Generate a 2-space-per-level indentation string.
fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}
