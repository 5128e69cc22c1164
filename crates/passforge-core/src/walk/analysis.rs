//! Analysis walkers: visit every node for side effect (never rebuilding),
//! then cache the rule's accumulated [`crate::rule::AnalysisRule::analysis_data`].

use std::collections::VecDeque;
use std::fmt;

use crate::cache::{AnalysisResult, Cache};
use crate::error::Result;
use crate::node::Node;
use crate::pass::Pass;
use crate::rule::AnalysisRule;
use crate::walk::Order;

#[derive(Clone)]
pub struct Walker<R> {
    rule: R,
    order: Order,
    reverse: bool,
    cache: Cache,
    verbose: bool,
}

impl<R: fmt::Debug> fmt::Debug for Walker<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}(rule={:?}, reverse={})",
            self.order, self.rule, self.reverse
        )
    }
}

impl<R: AnalysisRule> Walker<R> {
    pub fn new(rule: R, order: Order) -> Self {
        Self {
            rule,
            order,
            reverse: false,
            cache: Cache::new(),
            verbose: false,
        }
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn attach_cache(&mut self, cache: Cache) {
        self.cache = cache;
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// The cache currently attached to this walker (for cache-sharing tests).
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Run from the top (fresh cache) and discard the (always-unchanged)
    /// returned node; callers after side effects alone use this.
    pub fn run(&mut self, node: &Node) -> Result<()> {
        crate::pass::run(self, node)?;
        Ok(())
    }

    fn ordered_children(&self, node: &Node) -> Vec<Node> {
        let mut children: Vec<Node> = node.children().into_iter().map(|(_, c)| c).collect();
        if self.reverse {
            children.reverse();
        }
        children
    }

    fn walk(&mut self, node: &Node) {
        match self.order {
            Order::Pre => self.pre(node),
            Order::Post => self.post(node),
            Order::Level => self.level(node),
            Order::In => self.inorder(node),
        }
    }

    fn pre(&mut self, node: &Node) {
        self.rule.apply(node);
        for child in self.ordered_children(node) {
            self.pre(&child);
        }
    }

    fn post(&mut self, node: &Node) {
        for child in self.ordered_children(node) {
            self.post(&child);
        }
        self.rule.apply(node);
    }

    fn level(&mut self, node: &Node) {
        let mut queue: VecDeque<Node> = VecDeque::new();
        queue.push_back(node.clone());
        while let Some(current) = queue.pop_front() {
            self.rule.apply(&current);
            for child in self.ordered_children(&current) {
                queue.push_back(child);
            }
        }
    }

    fn inorder(&mut self, node: &Node) {
        let children = self.ordered_children(node);
        let split = children.len().div_ceil(2);
        for child in &children[..split] {
            self.inorder(child);
        }
        self.rule.apply(node);
        for child in &children[split..] {
            self.inorder(child);
        }
    }
}

impl<R: AnalysisRule + Clone + 'static> Pass for Walker<R> {
    fn invoke(&mut self, node: &Node) -> Result<Node> {
        self.rule.analysis_requirements().satisfy(node, &self.cache)?;
        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %node.kind(), "Running");
        }
        self.walk(node);
        let data = self.rule.analysis_data();
        self.cache.supersede(AnalysisResult::new(self.rule.name(), data));
        self.rule.after_call(&self.cache);
        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %node.kind(), "Completed");
        }
        Ok(node.clone())
    }

    fn propagate_cache(&mut self, cache: &Cache) {
        self.cache = cache.clone();
    }

    fn set_verbose_self(&mut self, state: bool) {
        self.verbose = state;
    }

    fn clone_box(&self) -> Box<dyn Pass> {
        Box::new(self.clone())
    }
}

#[allow(non_snake_case)]
pub fn Pre<R: AnalysisRule>(rule: R) -> Walker<R> {
    Walker::new(rule, Order::Pre)
}

#[allow(non_snake_case)]
pub fn Post<R: AnalysisRule>(rule: R) -> Walker<R> {
    Walker::new(rule, Order::Post)
}

#[allow(non_snake_case)]
pub fn Level<R: AnalysisRule>(rule: R) -> Walker<R> {
    Walker::new(rule, Order::Level)
}

#[allow(non_snake_case)]
pub fn In<R: AnalysisRule>(rule: R) -> Walker<R> {
    Walker::new(rule, Order::In)
}
