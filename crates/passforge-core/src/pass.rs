//! The common pass contract shared by walkers and combinators.
//!
//! Every [`Pass`] is a three-phase invocation: the cache is propagated down
//! the tree, `map` runs, and `after_call` hooks fire. `Pass` only covers
//! `Node -> Node` passes (rewrite and analysis walkers, and the combinators
//! built from them); a [`crate::walk::conversion::Walker`] produces an
//! arbitrary `Output` and so is invoked directly rather than through `Pass`.

use std::fmt;

use crate::cache::Cache;
use crate::error::Result;
use crate::node::Node;

/// A pass: something that can be invoked on a [`Node`] and participates in
/// cache propagation and verbose cascading.
pub trait Pass: fmt::Debug {
    /// Run this pass on `node`. Callers that are not themselves a combinator
    /// should use [`run`] instead, which also takes care of cache creation
    /// and propagation.
    fn invoke(&mut self, node: &Node) -> Result<Node>;

    /// Attach the shared cache to this pass and recursively to every child.
    fn propagate_cache(&mut self, cache: &Cache);

    /// This pass' immediate children, for cache-sharing verification and
    /// verbose cascading. Leaf passes (walkers) return an empty list.
    fn children_mut(&mut self) -> Vec<&mut dyn Pass> {
        Vec::new()
    }

    /// Toggle verbose tracing. With `cascade`, also toggles every child whose
    /// [`Pass::type_name`] is not listed in `exclude`.
    fn set_verbose(&mut self, state: bool, cascade: bool, exclude: &[&str]) {
        self.set_verbose_self(state);
        if cascade {
            for child in self.children_mut() {
                if !exclude.contains(&child.type_name()) {
                    child.set_verbose(state, true, exclude);
                }
            }
        }
    }

    /// Apply `state` to this pass alone (no cascading).
    fn set_verbose_self(&mut self, state: bool);

    /// A stable label used for `exclude` matching and verbose output; by
    /// default the type's own name.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Clone this pass into a fresh boxed trait object. This is what lets
    /// `Box<dyn Pass>` itself be `Clone` (see the impl below), which in turn
    /// is what lets combinators like [`crate::combinator::FixedPoint`] wrap
    /// an arbitrary, possibly-combined pass rather than only a single walker.
    fn clone_box(&self) -> Box<dyn Pass>;
}

impl Clone for Box<dyn Pass> {
    fn clone(&self) -> Box<dyn Pass> {
        self.as_ref().clone_box()
    }
}

impl Pass for Box<dyn Pass> {
    fn invoke(&mut self, node: &Node) -> Result<Node> {
        (**self).invoke(node)
    }

    fn propagate_cache(&mut self, cache: &Cache) {
        (**self).propagate_cache(cache)
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Pass> {
        (**self).children_mut()
    }

    fn set_verbose_self(&mut self, state: bool) {
        (**self).set_verbose_self(state)
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn clone_box(&self) -> Box<dyn Pass> {
        (**self).clone_box()
    }
}

#[cfg(test)]
mod pass_tests;

/// Run `pass` on `node` from the top: create a fresh [`Cache`], propagate it
/// through the whole pass tree, then invoke.
pub fn run(pass: &mut dyn Pass, node: &Node) -> Result<Node> {
    let cache = Cache::new();
    pass.propagate_cache(&cache);
    pass.invoke(node)
}

/// Run `pass` on `node`, sharing an existing cache rather than creating one.
/// Used when one pass is invoked as a sub-step of another (e.g. `Chain`
/// invoking each of its children) and by requirement satisfaction.
pub fn run_with_cache(pass: &mut dyn Pass, node: &Node, cache: &Cache) -> Result<Node> {
    pass.propagate_cache(cache);
    pass.invoke(node)
}
