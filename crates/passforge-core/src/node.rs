//! The [`Node`] model: records, containers, and atomics, reflected uniformly.
//!
//! A [`Node`] is anything the framework traverses: a user-defined [`Record`]
//! (kind tag plus an ordered list of named fields), one of the three built-in
//! containers (mapping, sequence, tuple), or an opaque [`Atom`] leaf.
//!
//! Record kinds are normally declared with [`crate::record!`] rather than by
//! hand-implementing [`Record`].

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// A field label: a record's named field, or a container's positional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Name(String),
    Index(usize),
}

impl Field {
    fn into_key(self) -> String {
        match self {
            Field::Name(s) => s,
            Field::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name(s) => write!(f, "{s}"),
            Field::Index(i) => write!(f, "{i}"),
        }
    }
}

/// An opaque leaf value: numbers, strings, and booleans have no children.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Int(i64),
    Float(u64), // bit pattern, so `Atom` can derive a total `PartialEq`
    Str(String),
    Bool(bool),
}

impl Atom {
    pub fn float(value: f64) -> Self {
        Atom::Float(value.to_bits())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Atom::Float(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// The synthetic kind name used for dispatch (`"int"`, `"float"`, `"str"`, `"bool"`).
    pub fn kind(&self) -> &'static str {
        match self {
            Atom::Int(_) => "int",
            Atom::Float(_) => "float",
            Atom::Str(_) => "str",
            Atom::Bool(_) => "bool",
        }
    }
}

/// A user-declared record kind: a kind tag, an ordered list of named fields,
/// and the means to rebuild a fresh instance with replacement children.
///
/// Implementations are almost always generated by [`crate::record!`] rather
/// than written by hand; see that macro for the expected shape.
pub trait Record: fmt::Debug {
    /// The record's own, most-specific kind name.
    fn kind(&self) -> &'static str;

    /// The record's kind chain, most-specific first, ending at the universal
    /// root kind `"Node"`.
    fn kind_chain(&self) -> &'static [&'static str];

    /// This record's fields, in declaration order.
    fn children(&self) -> Vec<(Field, Node)>;

    /// Construct a fresh record of the same kind from replacement children.
    /// `children` carries the same field labels [`Record::children`] produced,
    /// in any order, each holding a (possibly rewritten) replacement [`Node`].
    fn rebuild(&self, children: Vec<(Field, Node)>) -> Result<Node>;

    /// Narrowing hook used by [`Node::downcast_ref`].
    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another record of (assumed) the same kind.
    /// The default compares children deep-recursively field-for-field; override
    /// only if a record type needs a cheaper or different notion of equality.
    fn eq_record(&self, other: &dyn Record) -> bool {
        self.kind() == other.kind() && self.children() == other.children()
    }
}

/// Any value the framework can traverse, rewrite, convert, or analyze.
#[derive(Debug, Clone)]
pub enum Node {
    Record(Rc<dyn Record>),
    Mapping(IndexMap<String, Node>),
    Sequence(Vec<Node>),
    Tuple(Vec<Node>),
    Atom(Atom),
}

impl Node {
    pub fn record<R: Record + 'static>(record: R) -> Self {
        Node::Record(Rc::new(record))
    }

    pub fn int(value: i64) -> Self {
        Node::Atom(Atom::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Node::Atom(Atom::float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::Atom(Atom::Str(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Node::Atom(Atom::Bool(value))
    }

    pub fn mapping(entries: impl IntoIterator<Item = (String, Node)>) -> Self {
        Node::Mapping(entries.into_iter().collect())
    }

    pub fn sequence(items: impl IntoIterator<Item = Node>) -> Self {
        Node::Sequence(items.into_iter().collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = Node>) -> Self {
        Node::Tuple(items.into_iter().collect())
    }

    /// Narrow a [`Node::Record`] to a concrete record type, mirroring the
    /// dynamic `isinstance` checks a dynamically-typed host would perform once
    /// dispatch has confirmed the kind.
    pub fn downcast_ref<R: Record + 'static>(&self) -> Option<&R> {
        match self {
            Node::Record(r) => r.as_any().downcast_ref::<R>(),
            _ => None,
        }
    }

    /// The most specific kind tag: a record's own type name, or a container's
    /// synthetic kind (`"dict"`, `"list"`, `"tuple"`) or an atom's (`"int"`, ...).
    pub fn kind(&self) -> &str {
        match self {
            Node::Record(r) => r.kind(),
            Node::Mapping(_) => "dict",
            Node::Sequence(_) => "list",
            Node::Tuple(_) => "tuple",
            Node::Atom(a) => a.kind(),
        }
    }

    /// The full kind chain used for dispatch, most specific first.
    pub fn kind_chain(&self) -> Vec<&str> {
        match self {
            Node::Record(r) => r.kind_chain().to_vec(),
            _ => vec![self.kind(), "Node"],
        }
    }

    /// This node's children as `(label, child)` pairs, in traversal order.
    /// Mappings are visited in insertion order; sequences and tuples by index;
    /// atomics have no children.
    pub fn children(&self) -> Vec<(Field, Node)> {
        match self {
            Node::Record(r) => r.children(),
            Node::Mapping(m) => m
                .iter()
                .map(|(k, v)| (Field::Name(k.clone()), v.clone()))
                .collect(),
            Node::Sequence(s) => s
                .iter()
                .enumerate()
                .map(|(i, v)| (Field::Index(i), v.clone()))
                .collect(),
            Node::Tuple(t) => t
                .iter()
                .enumerate()
                .map(|(i, v)| (Field::Index(i), v.clone()))
                .collect(),
            Node::Atom(_) => Vec::new(),
        }
    }

    /// Rebuild this node's kind from replacement children. Kind-preserving:
    /// rebuilding a tuple yields a tuple, rebuilding a record re-validates the
    /// user schema.
    pub fn rebuild(&self, children: Vec<(Field, Node)>) -> Result<Node> {
        match self {
            Node::Record(r) => r.rebuild(children),
            Node::Mapping(_) => Ok(Node::Mapping(
                children
                    .into_iter()
                    .map(|(f, n)| (f.into_key(), n))
                    .collect(),
            )),
            Node::Sequence(_) => {
                let mut slots: Vec<Option<Node>> = vec![None; children.len()];
                for (f, n) in children {
                    let Field::Index(i) = f else {
                        return Err(Error::SchemaViolation {
                            kind: "list",
                            field: f.to_string(),
                        });
                    };
                    slots[i] = Some(n);
                }
                Ok(Node::Sequence(
                    slots
                        .into_iter()
                        .enumerate()
                        .map(|(i, n)| {
                            n.ok_or_else(|| Error::SchemaViolation {
                                kind: "list",
                                field: i.to_string(),
                            })
                        })
                        .collect::<Result<_>>()?,
                ))
            }
            Node::Tuple(_) => {
                let mut slots: Vec<Option<Node>> = vec![None; children.len()];
                for (f, n) in children {
                    let Field::Index(i) = f else {
                        return Err(Error::SchemaViolation {
                            kind: "tuple",
                            field: f.to_string(),
                        });
                    };
                    slots[i] = Some(n);
                }
                Ok(Node::Tuple(
                    slots
                        .into_iter()
                        .enumerate()
                        .map(|(i, n)| {
                            n.ok_or_else(|| Error::SchemaViolation {
                                kind: "tuple",
                                field: i.to_string(),
                            })
                        })
                        .collect::<Result<_>>()?,
                ))
            }
            Node::Atom(a) => {
                debug_assert!(children.is_empty(), "atoms have no children to rebuild");
                Ok(Node::Atom(a.clone()))
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Record(a), Node::Record(b)) => {
                a.kind() == b.kind() && a.eq_record(b.as_ref())
            }
            (Node::Mapping(a), Node::Mapping(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            (Node::Sequence(a), Node::Sequence(b)) => a == b,
            (Node::Tuple(a), Node::Tuple(b)) => a == b,
            (Node::Atom(a), Node::Atom(b)) => a == b,
            _ => false,
        }
    }
}

/// Declare a record kind: a kind tag, an ancestor chain for dispatch, and a
/// fixed set of named fields (each holding a [`Node`]).
///
/// ```ignore
/// record! {
///     pub struct MyInt [] { x }
/// }
/// record! {
///     pub struct MyAdd [] { left, right }
/// }
/// ```
///
/// The generated struct derives `Debug` and `Clone` and gets a `new`
/// constructor taking one [`Node`] per field, in declaration order.
#[macro_export]
macro_rules! record {
    ($(#[$meta:meta])* $vis:vis struct $name:ident [$($anc:literal),* $(,)?] { $($field:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $crate::node::Node),*
        }

        impl $name {
            pub fn new($($field: $crate::node::Node),*) -> Self {
                Self { $($field),* }
            }
        }

        impl $crate::node::Record for $name {
            fn kind(&self) -> &'static str {
                stringify!($name)
            }

            fn kind_chain(&self) -> &'static [&'static str] {
                &[stringify!($name), $($anc,)* "Node"]
            }

            fn children(&self) -> Vec<($crate::node::Field, $crate::node::Node)> {
                vec![$(($crate::node::Field::Name(stringify!($field).to_string()), self.$field.clone())),*]
            }

            fn rebuild(
                &self,
                children: Vec<($crate::node::Field, $crate::node::Node)>,
            ) -> $crate::error::Result<$crate::node::Node> {
                let mut fields: std::collections::HashMap<String, $crate::node::Node> =
                    std::collections::HashMap::new();
                for (f, n) in children {
                    let key = match f {
                        $crate::node::Field::Name(s) => s,
                        $crate::node::Field::Index(i) => i.to_string(),
                    };
                    fields.insert(key, n);
                }
                Ok($crate::node::Node::record($name {
                    $($field: fields.remove(stringify!($field)).ok_or_else(|| {
                        $crate::error::Error::SchemaViolation {
                            kind: stringify!($name),
                            field: stringify!($field).to_string(),
                        }
                    })?),*
                }))
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    };
}

#[cfg(test)]
mod node_tests;
