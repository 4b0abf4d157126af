//! Schema-directed mapping: value tree → statically declared type.
//!
//! Target types describe themselves through `serde::Deserialize`; a derived
//! struct's fields are its name-matched members. [`NodeDeserializer`] walks the
//! tree and answers serde's requests with these rules:
//!
//! - **Records** (structs, maps): the node must be an Object. Keys without a
//!   matching field are skipped, so payloads may carry extra data. Missing
//!   `Option` fields become `None`; any other missing field is a
//!   `SchemaMismatch` unless it is marked `#[serde(default)]`. Put
//!   `#[serde(default)]` on the struct itself (with a `Default` impl) to
//!   leave every unmatched member at its default.
//! - **Fixed-size sequences** (`[T; N]`, tuples): the node must be an Array of
//!   exactly `N` elements.
//! - **Growable sequences** (`Vec<T>`, `Box<[T]>`, sets): the node must be an
//!   Array; elements are mapped in order.
//! - **Scalars**: coerced per the table in [`crate::coerce`].
//!
//! Structural mismatches fail with `UnsupportedShape`, impossible scalar
//! conversions with `SchemaMismatch`. Any failure aborts the whole mapping.
//!
//! ```
//! use dynamic_json::{from_str, Node};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Pair {
//!     a: i32,
//!     b: f64,
//! }
//!
//! let pair: Pair = from_str(r#"{"a":1,"b":"2.5","extra":"ignored"}"#).unwrap();
//! assert_eq!((pair.a, pair.b), (1, 2.5));
//! ```

use serde::de::value::BorrowedStrDeserializer;
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;

use crate::coerce;
use crate::error::{JsonError, Result};
use crate::node::{Node, Object};
use crate::parser::parse;

/// Map a node onto `T`.
pub fn from_node<T: DeserializeOwned>(node: &Node) -> Result<T> {
    let result = T::deserialize(NodeDeserializer::new(node));
    if let Err(ref e) = result {
        tracing::debug!(
            target_type = std::any::type_name::<T>(),
            error = %e,
            "mapping failed"
        );
    }
    result
}

/// Parse JSON text and map the resulting tree onto `T`.
pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    from_node(&parse(text)?)
}

impl Node {
    /// Map this node onto `T`. See [`from_node`].
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        from_node(self)
    }
}

/// A serde `Deserializer` reading from a borrowed node.
#[derive(Debug, Clone, Copy)]
pub struct NodeDeserializer<'a> {
    node: &'a Node,
}

impl<'a> NodeDeserializer<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self { node }
    }

    fn shape_error(&self, expected: &str) -> JsonError {
        JsonError::UnsupportedShape(format!(
            "expected {expected}, found {}",
            self.node.kind()
        ))
    }

    fn array(&self, expected: &str) -> Result<&'a [Node]> {
        match self.node {
            Node::Array(items) => Ok(items.as_slice()),
            _ => Err(self.shape_error(expected)),
        }
    }

    fn object(&self, expected: &str) -> Result<&'a Object> {
        match self.node {
            Node::Object(object) => Ok(object),
            _ => Err(self.shape_error(expected)),
        }
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident : $t:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.$visit(coerce::to_integer::<$t>(self.node, stringify!($t))?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for NodeDeserializer<'de> {
    type Error = JsonError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            Node::Null => visitor.visit_unit(),
            Node::Boolean(b) => visitor.visit_bool(*b),
            Node::Number(n) => {
                // Integral values within the exactly-representable range go
                // out as integers so untyped targets keep them integral.
                if n.fract() == 0.0 && n.abs() <= 9_007_199_254_740_992.0 {
                    visitor.visit_i64(*n as i64)
                } else {
                    visitor.visit_f64(*n)
                }
            }
            Node::String(s) => visitor.visit_borrowed_str(s),
            Node::Array(items) => visitor.visit_seq(NodeSeqAccess::new(items)),
            Node::Object(object) => visitor.visit_map(NodeMapAccess::new(object)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(coerce::to_bool(self.node)?)
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(coerce::to_f32(self.node)?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(coerce::to_f64(self.node)?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_char(coerce::to_char(self.node)?)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            Node::String(s) => visitor.visit_borrowed_str(s),
            other => visitor.visit_string(coerce::to_text(other)?.into_owned()),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            Node::String(s) => visitor.visit_borrowed_bytes(s.as_bytes()),
            Node::Array(items) => visitor.visit_seq(NodeSeqAccess::new(items)),
            _ => Err(self.shape_error("string or array")),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            Node::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            Node::Null => visitor.visit_unit(),
            other => Err(JsonError::SchemaMismatch(format!(
                "cannot convert {} to unit",
                other.kind()
            ))),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let items = self.array("array")?;
        visitor.visit_seq(NodeSeqAccess::new(items))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        let items = self.array("array")?;
        if items.len() != len {
            return Err(JsonError::UnsupportedShape(format!(
                "expected array of exactly {len} elements, found {}",
                items.len()
            )));
        }
        visitor.visit_seq(NodeSeqAccess::new(items))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let object = self.object("object")?;
        visitor.visit_map(NodeMapAccess::new(object))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let object = self.object(&format!("object for struct {name}"))?;
        visitor.visit_map(NodeMapAccess::new(object))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.node {
            Node::String(variant) => {
                visitor.visit_enum(BorrowedStrDeserializer::<JsonError>::new(variant))
            }
            Node::Object(object) if object.len() == 1 => {
                let mut entries = object.iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(NodeEnumAccess {
                        variant: variant.as_str(),
                        value,
                    }),
                    None => Err(self.shape_error(&format!("variant of enum {name}"))),
                }
            }
            _ => Err(self.shape_error(&format!(
                "string or single-key object for enum {name}"
            ))),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i128 u128
    }
}

impl<'de> IntoDeserializer<'de, JsonError> for &'de Node {
    type Deserializer = NodeDeserializer<'de>;

    fn into_deserializer(self) -> Self::Deserializer {
        NodeDeserializer::new(self)
    }
}

struct NodeSeqAccess<'a> {
    iter: std::slice::Iter<'a, Node>,
}

impl<'a> NodeSeqAccess<'a> {
    fn new(items: &'a [Node]) -> Self {
        Self { iter: items.iter() }
    }
}

impl<'de> SeqAccess<'de> for NodeSeqAccess<'de> {
    type Error = JsonError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.iter.next() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct NodeMapAccess<'a> {
    entries: indexmap::map::Iter<'a, String, Node>,
    pending: Option<&'a Node>,
}

impl<'a> NodeMapAccess<'a> {
    fn new(object: &'a Object) -> Self {
        Self {
            entries: object.iter(),
            pending: None,
        }
    }
}

impl<'de> MapAccess<'de> for NodeMapAccess<'de> {
    type Error = JsonError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.entries.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                seed.deserialize(BorrowedStrDeserializer::<JsonError>::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        match self.pending.take() {
            Some(value) => seed.deserialize(NodeDeserializer::new(value)),
            None => Err(JsonError::SchemaMismatch(
                "map value requested before its key".to_string(),
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct NodeEnumAccess<'a> {
    variant: &'a str,
    value: &'a Node,
}

impl<'de> EnumAccess<'de> for NodeEnumAccess<'de> {
    type Error = JsonError;
    type Variant = NodeVariantAccess<'de>;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let variant = BorrowedStrDeserializer::<JsonError>::new(self.variant);
        let variant = seed.deserialize(variant)?;
        Ok((variant, NodeVariantAccess { value: self.value }))
    }
}

struct NodeVariantAccess<'a> {
    value: &'a Node,
}

impl<'de> VariantAccess<'de> for NodeVariantAccess<'de> {
    type Error = JsonError;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Node::Null => Ok(()),
            other => Err(JsonError::UnsupportedShape(format!(
                "expected null for unit variant, found {}",
                other.kind()
            ))),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(NodeDeserializer::new(self.value))
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple(NodeDeserializer::new(self.value), len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_map(NodeDeserializer::new(self.value), visitor)
    }
}
