//! # dynamic-json
//!
//! A dynamic JSON document model for scraping work: parse a response body,
//! poke around in it without a schema, pull typed data out of the parts you
//! understand, and write JSON back out.
//!
//! Every [`Node`] carries an explicit [`Kind`], objects keep insertion order,
//! and an explicit `null` is distinct from an absent key.
//!
//! ## Quick start
//!
//! ```rust
//! use dynamic_json::{parse, to_string, Node};
//!
//! let mut doc = parse(r#"{"a":1,"b":[1,2,3]}"#).unwrap();
//! assert_eq!(doc.get("a"), Some(&Node::Number(1.0)));
//!
//! doc.set("c", Node::Null).unwrap();
//! doc.get_mut("b").unwrap().delete(0);
//! assert_eq!(to_string(&doc), r#"{"a":1,"b":[2,3],"c":null}"#);
//! ```
//!
//! ## Modules
//!
//! - [`node`] — `Node`, `Object` and `Kind`: the value tree
//! - [`parser`] — JSON text/bytes → `Node`
//! - [`encoding`] — byte-stream encoding resolution ahead of parsing
//! - [`accessor`] — `has`/`get`/`set`/`delete` by key or position
//! - [`serializer`] — `Node` → canonical JSON text
//! - [`mapper`] — `Node` → any `serde::Deserialize` type
//! - [`convert`] — serde and `serde_json::Value` interop
//! - [`error`] — Error types

pub mod accessor;
mod coerce;
pub mod convert;
pub mod encoding;
pub mod error;
pub mod mapper;
pub mod node;
pub mod parser;
pub mod serializer;

pub use accessor::Index;
pub use convert::{serialize_value, to_node};
pub use encoding::encoding_for_label;
pub use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
pub use error::{JsonError, Result};
pub use mapper::{from_node, from_str, NodeDeserializer};
pub use node::{Kind, Node, Object};
pub use parser::{
    parse, parse_bytes, parse_container, parse_reader, parse_with_options, ParseOptions,
};
pub use serializer::{to_string, to_string_pretty, to_writer};
