//! `Filter(predicate, p, reuse)` — apply `p` only to nodes the predicate
//! accepts; pass every other node through unchanged.

use std::fmt;
use std::rc::Rc;

use crate::cache::Cache;
use crate::error::Result;
use crate::node::Node;
use crate::pass::Pass;

/// A pass gated by a predicate over the node it would be invoked on.
///
/// Cloning semantics mirror [`crate::combinator::FixedPoint`]: with
/// `reuse = false`, a single clone of the wrapped pass is created eagerly
/// (on [`Pass::propagate_cache`]) and reused for every accepted invocation,
/// so cache sharing is observable before the first predicate check runs.
#[derive(Clone)]
pub struct Filter<P> {
    predicate: Rc<dyn Fn(&Node) -> bool>,
    prototype: P,
    reuse: bool,
    clone: Option<P>,
    cache: Cache,
    verbose: bool,
}

impl<P: Pass + Clone + 'static> Filter<P> {
    pub fn new(predicate: impl Fn(&Node) -> bool + 'static, pass: P, reuse: bool) -> Self {
        Self {
            predicate: Rc::new(predicate),
            prototype: pass,
            reuse,
            clone: None,
            cache: Cache::new(),
            verbose: false,
        }
    }

    fn ensure_clone(&mut self) {
        if !self.reuse && self.clone.is_none() {
            let mut clone = self.prototype.clone();
            clone.propagate_cache(&self.cache);
            self.clone = Some(clone);
        }
    }

    fn instance(&mut self) -> &mut P {
        if self.reuse {
            &mut self.prototype
        } else {
            self.ensure_clone();
            self.clone.as_mut().unwrap()
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Filter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Filter(pass={:?}, reuse={})",
            self.prototype, self.reuse
        )
    }
}

impl<P: Pass + Clone + 'static> Pass for Filter<P> {
    fn invoke(&mut self, node: &Node) -> Result<Node> {
        if !(self.predicate)(node) {
            return Ok(node.clone());
        }
        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %node.kind(), "Running");
        }
        let result = self.instance().invoke(node)?;
        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %result.kind(), "Completed");
        }
        Ok(result)
    }

    fn propagate_cache(&mut self, cache: &Cache) {
        self.cache = cache.clone();
        if self.reuse {
            self.prototype.propagate_cache(cache);
        } else {
            self.ensure_clone();
            if let Some(clone) = &mut self.clone {
                clone.propagate_cache(cache);
            }
        }
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Pass> {
        if self.reuse {
            vec![&mut self.prototype as &mut dyn Pass]
        } else {
            self.clone
                .iter_mut()
                .map(|c| c as &mut dyn Pass)
                .collect()
        }
    }

    fn set_verbose_self(&mut self, state: bool) {
        self.verbose = state;
    }

    fn clone_box(&self) -> Box<dyn Pass> {
        Box::new(self.clone())
    }
}

/// `Filter(predicate, p, reuse=false)`.
#[allow(non_snake_case)]
pub fn Filter<P: Pass + Clone + 'static>(
    predicate: impl Fn(&Node) -> bool + 'static,
    pass: P,
) -> self::Filter<P> {
    self::Filter::new(predicate, pass, false)
}
