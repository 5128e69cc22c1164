//! Conversion walkers: reduce children bottom-up into `Operands`, then invoke
//! the rule to combine them into an arbitrary `Output`.
//!
//! A [`ConversionRule::Output`](crate::rule::ConversionRule::Output) is not
//! in general a [`Node`], so `Walker` here is invoked directly via
//! [`Walker::convert`] rather than through the [`crate::pass::Pass`] contract
//! shared by the rewrite and analysis walkers. Every nominal order reduces
//! children fully before invoking the rule: the rule's contract always wants
//! already-reduced operands, so `Pre`/`Level`/`In` differ from `Post` only in
//! how the *visitation* of intermediate nodes is sequenced, not in whether
//! operands are ready when the rule runs (see DESIGN.md).

use std::fmt;

use indexmap::IndexMap;

use crate::cache::Cache;
use crate::error::Result;
use crate::node::{Field, Node};
use crate::rule::{ConversionRule, Operands};
use crate::walk::{child_order, Order};

pub struct Walker<R> {
    rule: R,
    order: Order,
    reverse: bool,
    cache: Cache,
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

impl<R: ConversionRule> Walker<R> {
    pub fn new(rule: R, order: Order) -> Self {
        Self {
            rule,
            order,
            reverse: false,
            cache: Cache::new(),
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

    /// Run this walker from the top, creating a fresh cache.
    pub fn run(&mut self, node: &Node) -> Result<R::Output> {
        self.cache = Cache::new();
        self.convert(node)
    }

    pub fn convert(&mut self, node: &Node) -> Result<R::Output> {
        self.rule.analysis_requirements().satisfy(node, &self.cache)?;
        let output = self.reduce(node)?;
        self.rule.after_call(&self.cache);
        Ok(output)
    }

    fn reduce(&mut self, node: &Node) -> Result<R::Output> {
        let children = node.children();
        let n = children.len();
        let order = child_order(n, self.reverse);
        let mut results: Vec<Option<R::Output>> = vec![None; n];
        for &i in &order {
            let child = children[i].1.clone();
            results[i] = Some(self.reduce(&child)?);
        }
        let operands = Self::assemble(node, &children, results);
        self.rule.apply(node, &operands)
    }

    fn assemble(
        node: &Node,
        children: &[(Field, Node)],
        results: Vec<Option<R::Output>>,
    ) -> Operands<R::Output> {
        match node {
            Node::Record(_) => Operands::Record(
                children
                    .iter()
                    .zip(results)
                    .map(|((field, _), result)| (field.to_string(), result.unwrap()))
                    .collect::<IndexMap<_, _>>(),
            ),
            Node::Mapping(_) => Operands::Mapping(
                children
                    .iter()
                    .zip(results)
                    .map(|((field, _), result)| (field.to_string(), result.unwrap()))
                    .collect::<IndexMap<_, _>>(),
            ),
            Node::Sequence(_) => {
                Operands::Sequence(results.into_iter().map(Option::unwrap).collect())
            }
            Node::Tuple(_) => Operands::Tuple(results.into_iter().map(Option::unwrap).collect()),
            Node::Atom(_) => Operands::Atom,
        }
    }
}

#[allow(non_snake_case)]
pub fn Pre<R: ConversionRule>(rule: R) -> Walker<R> {
    Walker::new(rule, Order::Pre)
}

#[allow(non_snake_case)]
pub fn Post<R: ConversionRule>(rule: R) -> Walker<R> {
    Walker::new(rule, Order::Post)
}

#[allow(non_snake_case)]
pub fn Level<R: ConversionRule>(rule: R) -> Walker<R> {
    Walker::new(rule, Order::Level)
}

#[allow(non_snake_case)]
pub fn In<R: ConversionRule>(rule: R) -> Walker<R> {
    Walker::new(rule, Order::In)
}
