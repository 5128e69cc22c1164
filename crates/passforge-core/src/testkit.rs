//! Shared fixtures for unit tests across `passforge-core`: a tiny arithmetic
//! record family (`MyInt`, `MyAdd`) plus one rule of each flavor.

use indexmap::IndexMap;

use crate::cache::Cache;
use crate::node::{Atom, Node};
use crate::record;
use crate::rule::{AnalysisRule, ConversionRule, RewriteOutcome, RewriteRule};

record! {
    pub struct MyInt ["MyMath"] { value }
}

record! {
    pub struct MyAdd ["MyMath"] { left, right }
}

fn as_int(node: &Node) -> Option<i64> {
    match node {
        Node::Atom(Atom::Int(i)) => Some(*i),
        _ => None,
    }
}

/// Folds `MyAdd(MyInt, MyInt)` into a single `MyInt`, leaving anything else
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct MySimplify;

impl RewriteRule for MySimplify {
    fn map_kind(&mut self, kind: &str, node: &Node) -> RewriteOutcome {
        if kind != "MyAdd" {
            return RewriteOutcome::Unhandled;
        }
        let Some(add) = node.downcast_ref::<MyAdd>() else {
            return RewriteOutcome::Unhandled;
        };
        match (
            add.left.downcast_ref::<MyInt>(),
            add.right.downcast_ref::<MyInt>(),
        ) {
            (Some(left), Some(right)) => {
                let (Node::Atom(Atom::Int(a)), Node::Atom(Atom::Int(b))) =
                    (&left.value, &right.value)
                else {
                    return RewriteOutcome::Unchanged;
                };
                RewriteOutcome::Replace(Node::record(MyInt::new(Node::int(a + b))))
            }
            _ => RewriteOutcome::Unchanged,
        }
    }
}

/// Evaluates a `MyMath` expression to a plain `i64`.
#[derive(Debug, Clone, Default)]
pub struct MyEvaluate;

impl ConversionRule for MyEvaluate {
    type Output = i64;

    fn map_kind(
        &mut self,
        kind: &str,
        node: &Node,
        operands: &crate::rule::Operands<i64>,
    ) -> Option<i64> {
        match kind {
            "MyInt" => {
                let int = node.downcast_ref::<MyInt>()?;
                as_int(&int.value)
            }
            "MyAdd" => {
                let left = operands.get("left").copied()?;
                let right = operands.get("right").copied()?;
                Some(left + right)
            }
            _ => None,
        }
    }
}

/// Counts how many `MyAdd` nodes appear in the tree.
#[derive(Debug, Clone, Default)]
pub struct CountTerms {
    pub count: i64,
}

impl AnalysisRule for CountTerms {
    fn name(&self) -> &'static str {
        "CountTerms"
    }

    fn map_kind(&mut self, kind: &str, _node: &Node) -> bool {
        if kind == "MyAdd" {
            self.count += 1;
            true
        } else {
            false
        }
    }

    fn analysis_data(&self) -> IndexMap<String, Node> {
        let mut data = IndexMap::new();
        data.insert("count".to_string(), Node::int(self.count));
        data
    }
}

/// Records the order in which nodes were visited, by kind.
#[derive(Debug, Clone, Default)]
pub struct WalkOrder {
    pub visited: Vec<String>,
}

impl AnalysisRule for WalkOrder {
    fn name(&self) -> &'static str {
        "WalkOrder"
    }

    fn generic_map(&mut self, node: &Node) {
        self.visited.push(node.kind().to_string());
    }

    fn analysis_data(&self) -> IndexMap<String, Node> {
        let mut data = IndexMap::new();
        data.insert(
            "visited".to_string(),
            Node::sequence(self.visited.iter().cloned().map(Node::string)),
        );
        data
    }
}

pub fn tree() -> Node {
    Node::record(MyAdd::new(
        Node::record(MyAdd::new(
            Node::record(MyInt::new(Node::int(1))),
            Node::record(MyInt::new(Node::int(2))),
        )),
        Node::record(MyInt::new(Node::int(3))),
    ))
}

pub fn cache_entry_names(cache: &Cache) -> Vec<String> {
    cache.history().into_iter().map(|e| e.name).collect()
}
