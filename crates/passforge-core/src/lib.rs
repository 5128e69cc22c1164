//! A generic framework for expressing program transformations over
//! tree-shaped intermediate representations as composable passes.
//!
//! The model is deliberately narrow: a [`node::Node`] is either a
//! user-declared [`node::Record`] (see [`record!`]) or one of three built-in
//! containers or an atomic leaf. A pass visits and, depending on its flavor,
//! rewrites, converts, or merely analyzes that tree:
//!
//! - [`rule::RewriteRule`] + [`walk::rewrite::Walker`]: `Node -> Node`.
//! - [`rule::ConversionRule`] + [`walk::conversion::Walker`]: `Node -> Output`.
//! - [`rule::AnalysisRule`] + [`walk::analysis::Walker`]: `Node -> Node`
//!   (unchanged), with side effects cached in a shared [`cache::Cache`].
//!
//! Rewrite and analysis walkers share the object-safe [`pass::Pass`]
//! contract, so they compose uniformly through [`combinator::Chain`],
//! [`combinator::FixedPoint`], [`combinator::Filter`], and
//! [`combinator::Match`].
//!
//! ```ignore
//! use passforge_core::prelude::*;
//!
//! record! { pub struct MyInt [] { value } }
//! record! { pub struct MyAdd [] { left, right } }
//!
//! #[derive(Debug, Clone)]
//! struct Fold;
//!
//! impl RewriteRule for Fold {
//!     fn map_kind(&mut self, kind: &str, node: &Node) -> RewriteOutcome {
//!         if kind != "MyAdd" {
//!             return RewriteOutcome::Unhandled;
//!         }
//!         let add = node.downcast_ref::<MyAdd>().unwrap();
//!         match (&add.left, &add.right) {
//!             (Node::Atom(Atom::Int(a)), Node::Atom(Atom::Int(b))) => {
//!                 RewriteOutcome::Replace(Node::int(a + b))
//!             }
//!             _ => RewriteOutcome::Unchanged,
//!         }
//!     }
//! }
//!
//! let model = Node::record(MyAdd::new(Node::int(1), Node::int(2)));
//! let folded = walk::rewrite::Post(Fold).run(&model).unwrap();
//! assert_eq!(folded, Node::int(3));
//! ```

pub mod cache;
pub mod combinator;
pub mod error;
pub mod node;
pub mod pass;
pub mod pattern;
pub mod rule;
pub mod walk;

#[cfg(test)]
pub(crate) mod testkit;

/// Common imports for crates building on top of `passforge-core`.
pub mod prelude {
    pub use crate::cache::{AnalysisResult, Cache};
    pub use crate::combinator::{Chain, Filter, FixedPoint, Match};
    pub use crate::error::{Error, Result};
    pub use crate::node::{Atom, Field, Node, Record};
    pub use crate::pass::Pass;
    pub use crate::pattern::{FieldPattern, MatchResult, Pattern};
    pub use crate::rule::{
        AnalysisRequirements, AnalysisRule, ConversionRule, Operands, Requirement, RewriteRule,
        RewriteOutcome,
    };
    pub use crate::walk;
    pub use crate::walk::Order;
    pub use crate::record;
}
