//! `Chain(p1, p2, ..., pk)` — apply each pass in sequence, threading the
//! result of one into the next.

use std::fmt;

use crate::cache::Cache;
use crate::error::Result;
use crate::node::Node;
use crate::pass::Pass;

pub struct Chain {
    passes: Vec<Box<dyn Pass>>,
    verbose: bool,
}

impl Chain {
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Self {
        Self {
            passes,
            verbose: false,
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.passes.iter()).finish()
    }
}

impl Clone for Chain {
    fn clone(&self) -> Self {
        Self {
            passes: self.passes.iter().map(|p| p.clone_box()).collect(),
            verbose: self.verbose,
        }
    }
}

impl Pass for Chain {
    fn invoke(&mut self, node: &Node) -> Result<Node> {
        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %node.kind(), "Running");
        }
        let mut current = node.clone();
        for pass in &mut self.passes {
            current = pass.invoke(&current)?;
        }
        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %current.kind(), "Completed");
        }
        Ok(current)
    }

    fn propagate_cache(&mut self, cache: &Cache) {
        for pass in &mut self.passes {
            pass.propagate_cache(cache);
        }
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Pass> {
        self.passes.iter_mut().map(|p| p.as_mut()).collect()
    }

    fn set_verbose_self(&mut self, state: bool) {
        self.verbose = state;
    }

    fn clone_box(&self) -> Box<dyn Pass> {
        Box::new(self.clone())
    }
}

/// `Chain(p1, p2, ..., pk)`.
#[allow(non_snake_case)]
pub fn Chain(passes: Vec<Box<dyn Pass>>) -> self::Chain {
    self::Chain::new(passes)
}
