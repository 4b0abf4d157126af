//! Error types for parsing, access and mapping operations.

use std::fmt::Display;

use thiserror::Error;

use crate::node::Kind;

/// Errors that can occur while parsing, navigating or mapping a value tree.
///
/// "Not found" is never an error: lookups return `Option`/`bool` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonError {
    /// The input text was not well-formed JSON.
    /// Line and column are 1-based and count characters, not bytes.
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The input bytes could not be decoded in the declared or detected encoding,
    /// or a string literal contained an unpaired UTF-16 surrogate escape.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// An object- or array-specific operation was invoked on a node of another kind.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    /// A scalar could not be coerced onto the requested target type.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The node's structure (object vs. array vs. scalar) is incompatible with
    /// the target's declared shape.
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),
}

impl serde::de::Error for JsonError {
    fn custom<T: Display>(msg: T) -> Self {
        JsonError::SchemaMismatch(msg.to_string())
    }
}

/// Convenience alias used throughout dynamic-json.
pub type Result<T> = std::result::Result<T, JsonError>;
