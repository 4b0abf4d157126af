//! Schema-less read/write/delete/existence access over a [`Node`].
//!
//! A lookup key is either a property name (object access) or an ordinal
//! position (array access); both implement [`Index`]. Lookups against the wrong
//! kind of node behave exactly like lookups of an absent key: `has` is false,
//! `get` is `None` and `delete` is false. Only `set` reports a kind error,
//! because there is no sensible place to put the value.
//!
//! ```
//! use dynamic_json::{parse, Node};
//!
//! let mut doc = parse(r#"{"a":1,"b":[1,2,3]}"#).unwrap();
//! assert_eq!(doc.get("b").and_then(|b| b.get(1)), Some(&Node::Number(2.0)));
//!
//! doc.set("c", Node::Null).unwrap();
//! assert!(doc.has("c"));
//! assert!(doc.delete("a"));
//! assert!(!doc.delete("a"));
//! ```

use crate::error::{JsonError, Result};
use crate::node::{Kind, Node};

/// A key usable with the accessor methods on [`Node`]: `&str`/`String` for
/// object properties, `usize` for array positions.
///
/// This trait is sealed.
pub trait Index: private::Sealed {
    #[doc(hidden)]
    fn index_into<'v>(&self, node: &'v Node) -> Option<&'v Node>;

    #[doc(hidden)]
    fn index_into_mut<'v>(&self, node: &'v mut Node) -> Option<&'v mut Node>;

    #[doc(hidden)]
    fn store_into(&self, node: &mut Node, value: Node) -> Result<()>;

    #[doc(hidden)]
    fn remove_from(&self, node: &mut Node) -> Option<Node>;
}

impl Index for usize {
    fn index_into<'v>(&self, node: &'v Node) -> Option<&'v Node> {
        node.as_array()?.get(*self)
    }

    fn index_into_mut<'v>(&self, node: &'v mut Node) -> Option<&'v mut Node> {
        node.as_array_mut()?.get_mut(*self)
    }

    /// Existing position: replace in place. Anything past the end: append a
    /// single element, so no holes are ever created.
    fn store_into(&self, node: &mut Node, value: Node) -> Result<()> {
        let found = node.kind();
        let array = node.as_array_mut().ok_or(JsonError::TypeMismatch {
            expected: Kind::Array,
            found,
        })?;
        match array.get_mut(*self) {
            Some(slot) => *slot = value,
            None => array.push(value),
        }
        Ok(())
    }

    fn remove_from(&self, node: &mut Node) -> Option<Node> {
        let array = node.as_array_mut()?;
        if *self < array.len() {
            Some(array.remove(*self))
        } else {
            None
        }
    }
}

impl Index for str {
    fn index_into<'v>(&self, node: &'v Node) -> Option<&'v Node> {
        node.as_object()?.get(self)
    }

    fn index_into_mut<'v>(&self, node: &'v mut Node) -> Option<&'v mut Node> {
        node.as_object_mut()?.get_mut(self)
    }

    fn store_into(&self, node: &mut Node, value: Node) -> Result<()> {
        let found = node.kind();
        let object = node.as_object_mut().ok_or(JsonError::TypeMismatch {
            expected: Kind::Object,
            found,
        })?;
        object.insert(self, value);
        Ok(())
    }

    fn remove_from(&self, node: &mut Node) -> Option<Node> {
        node.as_object_mut()?.remove(self)
    }
}

impl Index for String {
    fn index_into<'v>(&self, node: &'v Node) -> Option<&'v Node> {
        self.as_str().index_into(node)
    }

    fn index_into_mut<'v>(&self, node: &'v mut Node) -> Option<&'v mut Node> {
        self.as_str().index_into_mut(node)
    }

    fn store_into(&self, node: &mut Node, value: Node) -> Result<()> {
        self.as_str().store_into(node, value)
    }

    fn remove_from(&self, node: &mut Node) -> Option<Node> {
        self.as_str().remove_from(node)
    }
}

impl<T: Index + ?Sized> Index for &T {
    fn index_into<'v>(&self, node: &'v Node) -> Option<&'v Node> {
        (**self).index_into(node)
    }

    fn index_into_mut<'v>(&self, node: &'v mut Node) -> Option<&'v mut Node> {
        (**self).index_into_mut(node)
    }

    fn store_into(&self, node: &mut Node, value: Node) -> Result<()> {
        (**self).store_into(node, value)
    }

    fn remove_from(&self, node: &mut Node) -> Option<Node> {
        (**self).remove_from(node)
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<T: Sealed + ?Sized> Sealed for &T {}
}

impl Node {
    /// Existence check. Never fails; false for absent keys, out-of-range
    /// positions and lookups against the wrong kind of node.
    pub fn has<I: Index>(&self, index: I) -> bool {
        index.index_into(self).is_some()
    }

    /// Borrow a child. `None` means absent; an explicit null is `Some(&Node::Null)`.
    pub fn get<I: Index>(&self, index: I) -> Option<&Node> {
        index.index_into(self)
    }

    /// Mutably borrow a child; changes are made directly in the tree.
    pub fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Node> {
        index.index_into_mut(self)
    }

    /// Replace the child at an existing key/position (position preserved) or
    /// append a new one. Fails with `TypeMismatch` when the key kind does not
    /// match the node kind.
    pub fn set<I: Index, V: Into<Node>>(&mut self, index: I, value: V) -> Result<()> {
        index.store_into(self, value.into())
    }

    /// Remove a child, reporting whether anything was removed. Array elements
    /// after the removed one shift down by one position.
    pub fn delete<I: Index>(&mut self, index: I) -> bool {
        index.remove_from(self).is_some()
    }

    /// Remove and return a child.
    pub fn take<I: Index>(&mut self, index: I) -> Option<Node> {
        index.remove_from(self)
    }

    /// Dynamic member lookup by text: a property name on objects, a decimal
    /// position on arrays.
    pub fn get_member(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Object(o) => o.get(name),
            Node::Array(a) => name.parse::<usize>().ok().and_then(|i| a.get(i)),
            _ => None,
        }
    }

    /// Member names in enumeration order: keys for objects, `"0"..` for arrays.
    pub fn member_names(&self) -> Vec<String> {
        match self {
            Node::Object(o) => o.keys().map(str::to_string).collect(),
            Node::Array(a) => (0..a.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}
