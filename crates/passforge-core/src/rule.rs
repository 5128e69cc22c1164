//! The three rule flavors and their shared kind-chain dispatch.
//!
//! A rule scans a node's kind chain from most- to least-specific, invoking
//! the first per-kind handler that matches (the `map_kind` methods below
//! stand in for the `map_<Kind>` naming convention: the kind is passed as a
//! runtime string rather than selected by method name, since Rust has no
//! reflection over method names). Falling off the end of the chain without a
//! match falls back to `generic_map`.
//!
//! Rules may handle the built-in container kinds (`"dict"`, `"list"`,
//! `"tuple"`) the same way they handle record kinds: by matching on those
//! names in `map_kind`.

use std::fmt;

use indexmap::IndexMap;

use crate::cache::Cache;
use crate::error::Result;
use crate::node::Node;

/// The outcome of attempting a [`RewriteRule`] handler for one candidate kind.
#[derive(Debug)]
pub enum RewriteOutcome {
    /// No handler registered for this kind; keep scanning the kind chain.
    Unhandled,
    /// A handler matched and declined to change the node.
    Unchanged,
    /// A handler matched and replaced the node.
    Replace(Node),
}

/// A rewrite pass: maps a `Node` to itself or to a replacement `Node`.
pub trait RewriteRule: fmt::Debug {
    /// Attempt to handle `node`, whose dispatch is currently considering the
    /// kind `kind` (one link of [`Node::kind_chain`], most specific first).
    fn map_kind(&mut self, _kind: &str, _node: &Node) -> RewriteOutcome {
        RewriteOutcome::Unhandled
    }

    /// Fallback invoked once the whole kind chain has gone unmatched.
    /// `None` leaves the node unchanged.
    fn generic_map(&mut self, _node: &Node) -> Option<Node> {
        None
    }

    /// Called once after the enclosing walker completes, with the shared
    /// cache. Rules whose rewrite invalidates the premise of a prior analysis
    /// call `cache.invalidate(name)` here.
    fn after_call(&mut self, _cache: &Cache) {}

    /// Analyses this rule depends on; satisfied automatically before the
    /// walker dispatches to this rule on each invocation (see
    /// [`crate::walk::rewrite::Walker`]).
    fn analysis_requirements(&self) -> AnalysisRequirements {
        AnalysisRequirements::default()
    }

    /// Dispatch `node` through the kind chain, falling back to
    /// [`RewriteRule::generic_map`]. This is the method a [`crate::walk::Order`]
    /// calls at each visited position; it is provided so implementors only
    /// need to write `map_kind`/`generic_map`.
    fn apply(&mut self, node: &Node) -> Node {
        for kind in node.kind_chain() {
            match self.map_kind(kind, node) {
                RewriteOutcome::Unhandled => continue,
                RewriteOutcome::Unchanged => return node.clone(),
                RewriteOutcome::Replace(replacement) => return replacement,
            }
        }
        self.generic_map(node).unwrap_or_else(|| node.clone())
    }
}

/// The reduced children passed to a [`ConversionRule`] handler, already
/// converted to `T`. Shaped like the node's own children: a field-indexed
/// record for record kinds, and the matching shape for each container kind.
#[derive(Debug, Clone)]
pub enum Operands<T> {
    Record(IndexMap<String, T>),
    Mapping(IndexMap<String, T>),
    Sequence(Vec<T>),
    Tuple(Vec<T>),
    Atom,
}

impl<T> Operands<T> {
    pub fn get(&self, field: &str) -> Option<&T> {
        match self {
            Operands::Record(m) | Operands::Mapping(m) => m.get(field),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Operands::Sequence(v) | Operands::Tuple(v) => v.as_slice(),
            _ => &[],
        }
    }
}

/// A conversion pass: maps a `Node` plus its already-reduced operands to an
/// arbitrary `Output` (not necessarily a `Node`).
///
/// `operands` holds results already produced by converting this node's
/// children; handlers must not assume the input node's own children are
/// still meaningful to re-visit (doing so would break the determinism
/// invariant: converting the same model twice must not observe mutation).
pub trait ConversionRule: fmt::Debug {
    type Output: Clone + Default;

    fn map_kind(
        &mut self,
        _kind: &str,
        _node: &Node,
        _operands: &Operands<Self::Output>,
    ) -> Option<Self::Output> {
        None
    }

    fn generic_map(
        &mut self,
        _node: &Node,
        _operands: &Operands<Self::Output>,
    ) -> Option<Self::Output> {
        None
    }

    fn after_call(&mut self, _cache: &Cache) {}

    fn analysis_requirements(&self) -> AnalysisRequirements {
        AnalysisRequirements::default()
    }

    /// Dispatch `node` through the kind chain, falling back to
    /// [`ConversionRule::generic_map`]. A total dispatch miss is benign, same
    /// as for [`RewriteRule`]/[`AnalysisRule`]: `Output` is arbitrary and has
    /// no general notion of "leave it unchanged", so the miss resolves to
    /// `Output::default()` rather than an error. This matters most for atomic
    /// leaves a rule never names a handler for — e.g. a `MyInt` handler that
    /// reads its own field directly rather than through `operands` leaves the
    /// wrapped `int` atom undispatched, and that must not fail the whole
    /// conversion.
    fn apply(&mut self, node: &Node, operands: &Operands<Self::Output>) -> Result<Self::Output> {
        for kind in node.kind_chain() {
            if let Some(output) = self.map_kind(kind, node, operands) {
                return Ok(output);
            }
        }
        Ok(self.generic_map(node, operands).unwrap_or_default())
    }
}

/// An analysis pass: visits nodes for side effect, accumulating into its own
/// state, and exposes that state as [`AnalysisRule::analysis_data`].
pub trait AnalysisRule: fmt::Debug {
    /// The name this analysis is cached under (the crate's substitute for a
    /// dynamically-discovered class name).
    fn name(&self) -> &'static str;

    /// Attempt to handle `node` for kind `kind`. Return `true` once handled,
    /// to stop scanning the kind chain.
    fn map_kind(&mut self, _kind: &str, _node: &Node) -> bool {
        false
    }

    fn generic_map(&mut self, _node: &Node) {}

    /// The accumulated facts, summarized as of the current call. Becomes the
    /// `data` of the [`crate::cache::AnalysisResult`] the enclosing walker
    /// caches after a full traversal.
    fn analysis_data(&self) -> IndexMap<String, Node>;

    fn after_call(&mut self, _cache: &Cache) {}

    fn analysis_requirements(&self) -> AnalysisRequirements {
        AnalysisRequirements::default()
    }

    fn apply(&mut self, node: &Node) {
        for kind in node.kind_chain() {
            if self.map_kind(kind, node) {
                return;
            }
        }
        self.generic_map(node);
    }
}

/// One declared prerequisite: run a specific analysis (in a specific walk
/// order) over the current model and cache its result before the declaring
/// rule runs.
pub struct Requirement {
    name: &'static str,
    run: Box<dyn Fn(&Node, &Cache) -> Result<()>>,
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement").field("name", &self.name).finish()
    }
}

impl Requirement {
    /// Build a requirement from an analysis-rule prototype and the walk order
    /// it should run under (defaulting to `Post`, matching the source's bare
    /// `(AnalysisRule-class)` requirement form).
    pub fn new<R>(prototype: R, order: crate::walk::Order) -> Self
    where
        R: AnalysisRule + Clone + 'static,
    {
        let name = prototype.name();
        Self {
            name,
            run: Box::new(move |node, cache| {
                let mut walker = crate::walk::analysis::Walker::new(prototype.clone(), order);
                crate::pass::run_with_cache(&mut walker, node, cache)?;
                Ok(())
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn satisfy(&self, node: &Node, cache: &Cache) -> Result<()> {
        (self.run)(node, cache)
    }
}

/// An ordered list of [`Requirement`]s a rule declares before it may run.
#[derive(Debug, Default)]
pub struct AnalysisRequirements {
    pub requirements: Vec<Requirement>,
}

impl AnalysisRequirements {
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self { requirements }
    }

    pub(crate) fn satisfy(&self, node: &Node, cache: &Cache) -> Result<()> {
        for requirement in &self.requirements {
            requirement.satisfy(node, cache)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod rule_tests;
