//! `FixedPoint(p, max_iter, reuse)` — apply `p` repeatedly until the model
//! stops changing, or `max_iter` iterations have run.

use std::fmt;

use crate::cache::Cache;
use crate::error::Result;
use crate::node::Node;
use crate::pass::Pass;

const DEFAULT_MAX_ITER: usize = 1000;

/// Repeated application of one pass to a structural fixed point.
///
/// When `reuse` is false (the default), a fresh clone of the wrapped pass is
/// used for each iteration rather than the same instance run repeatedly —
/// these clones are exactly what [`Pass::children_mut`] exposes. The first
/// clone is created eagerly, on [`Pass::propagate_cache`], so cache-sharing
/// is observable even before the first [`Pass::invoke`].
#[derive(Clone)]
pub struct FixedPoint<P> {
    prototype: P,
    max_iter: usize,
    reuse: bool,
    clones: Vec<P>,
    cache: Cache,
    verbose: bool,
}

impl<P: Pass + Clone + 'static> FixedPoint<P> {
    pub fn new(pass: P, max_iter: usize, reuse: bool) -> Self {
        Self {
            prototype: pass,
            max_iter,
            reuse,
            clones: Vec::new(),
            cache: Cache::new(),
            verbose: false,
        }
    }

    fn ensure_initial_clone(&mut self) {
        if !self.reuse && self.clones.is_empty() {
            let mut clone = self.prototype.clone();
            clone.propagate_cache(&self.cache);
            self.clones.push(clone);
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for FixedPoint<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FixedPoint(pass={:?}, max_iter={}, reuse={})",
            self.prototype, self.max_iter, self.reuse
        )
    }
}

impl<P: Pass + Clone + 'static> Pass for FixedPoint<P> {
    fn invoke(&mut self, node: &Node) -> Result<Node> {
        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %node.kind(), "Running");
        }
        self.ensure_initial_clone();

        let mut current = node.clone();
        let mut i = 0usize;
        loop {
            let next = if self.reuse {
                self.prototype.invoke(&current)?
            } else {
                if i >= self.clones.len() {
                    let mut clone = self.prototype.clone();
                    clone.propagate_cache(&self.cache);
                    self.clones.push(clone);
                }
                self.clones[i].invoke(&current)?
            };
            let converged = next == current;
            current = next;
            if converged || i >= self.max_iter {
                break;
            }
            i += 1;
        }

        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %current.kind(), "Completed");
        }
        Ok(current)
    }

    fn propagate_cache(&mut self, cache: &Cache) {
        self.cache = cache.clone();
        if self.reuse {
            self.prototype.propagate_cache(cache);
        } else {
            self.ensure_initial_clone();
            for clone in &mut self.clones {
                clone.propagate_cache(cache);
            }
        }
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Pass> {
        if self.reuse {
            vec![&mut self.prototype as &mut dyn Pass]
        } else {
            self.clones.iter_mut().map(|c| c as &mut dyn Pass).collect()
        }
    }

    fn set_verbose_self(&mut self, state: bool) {
        self.verbose = state;
    }

    fn clone_box(&self) -> Box<dyn Pass> {
        Box::new(self.clone())
    }
}

/// `FixedPoint(p, max_iter=1000, reuse=false)`.
#[allow(non_snake_case)]
pub fn FixedPoint<P: Pass + Clone + 'static>(pass: P) -> self::FixedPoint<P> {
    self::FixedPoint::new(pass, DEFAULT_MAX_ITER, false)
}
