//! `passforge`: the user-facing facade over [`passforge_core`].
//!
//! `passforge-core` is split out so the tree-walk engine, dispatch, and cache
//! can be depended on without the convenience re-exports here; most users
//! should just depend on this crate and `use passforge::prelude::*`.
//!
//! ```
//! use passforge::prelude::*;
//!
//! record! { pub struct MyInt [] { value } }
//! record! { pub struct MyAdd [] { left, right } }
//!
//! #[derive(Debug, Clone, Default)]
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

pub use passforge_core::*;
