//! Structural traversal in four canonical orders, one module per rule flavor.
//!
//! Rewrite and analysis walkers share the object-safe [`crate::pass::Pass`]
//! contract (`Node -> Node`) and so can be composed with [`crate::combinator`].
//! Conversion walkers produce an arbitrary `Output` and are invoked directly.

pub mod analysis;
pub mod conversion;
pub mod rewrite;

use crate::node::Field;

/// The four traversal orders a [`Walker`](rewrite::Walker) supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Visit the node, then recurse into children left-to-right.
    Pre,
    /// Recurse into children left-to-right, then visit the node.
    Post,
    /// Breadth-first: the root, then every depth-1 child, then depth-2, ...
    Level,
    /// Recurse into the first `ceil(n/2)` children, visit the node, then
    /// recurse into the remaining `floor(n/2)`.
    In,
}

/// The traversal sequence of child positions for `n` children: `0..n`, or
/// reversed when `reverse` is set. Used for *visitation* order only — rebuild
/// always restores each child's original field label, so `reverse` never
/// reorders a rebuilt record's or container's fields.
pub(crate) fn child_order(n: usize, reverse: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    if reverse {
        indices.reverse();
    }
    indices
}

pub(crate) fn field_key(field: &Field) -> String {
    field.to_string()
}
