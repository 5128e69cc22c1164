use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::node::{Atom, Node};
use crate::record;
use crate::rule::RewriteRule;
use crate::testkit::{tree, MyAdd, MyInt, MySimplify};

record! {
    pub struct MyTriple [] { a, b, c }
}

/// Logs every node's kind it is asked to handle, in visitation order, and
/// never changes anything — a rewrite-flavored stand-in for `testkit::WalkOrder`
/// (which only exists for `AnalysisRule`).
#[derive(Debug, Clone)]
struct VisitLog(Rc<RefCell<Vec<String>>>);

impl VisitLog {
    fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (Self(log.clone()), log)
    }
}

impl RewriteRule for VisitLog {
    fn generic_map(&mut self, node: &Node) -> Option<Node> {
        self.0.borrow_mut().push(node.kind().to_string());
        None
    }
}

fn two_level_add() -> Node {
    Node::record(MyAdd::new(
        Node::record(MyInt::new(Node::int(1))),
        Node::record(MyInt::new(Node::int(2))),
    ))
}

#[test]
fn pre_order_visits_parent_before_children() {
    let (rule, log) = VisitLog::new();
    Walker::new(rule, Order::Pre).run(&tree()).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["MyAdd", "MyAdd", "MyInt", "int", "MyInt", "int", "MyInt", "int"],
    );
}

#[test]
fn post_order_visits_children_before_parent() {
    let (rule, log) = VisitLog::new();
    Walker::new(rule, Order::Post).run(&tree()).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["int", "MyInt", "int", "MyInt", "MyAdd", "int", "MyInt", "MyAdd"],
    );
}

#[test]
fn level_order_is_breadth_first() {
    let (rule, log) = VisitLog::new();
    Walker::new(rule, Order::Level).run(&tree()).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["MyAdd", "MyAdd", "MyInt", "MyInt", "MyInt", "int", "int", "int"],
    );
}

#[test]
fn in_order_even_arity_splits_half_and_half() {
    let (rule, log) = VisitLog::new();
    Walker::new(rule, Order::In).run(&two_level_add()).unwrap();
    // MyAdd has 2 children; ceil(2/2) = 1 recurses before the parent, 1 after.
    assert_eq!(*log.borrow(), vec!["int", "MyInt", "MyAdd", "int", "MyInt"]);
}

#[test]
fn in_order_odd_arity_recurses_ceil_half_before_parent() {
    let (rule, log) = VisitLog::new();
    let triple = Node::record(MyTriple::new(Node::int(1), Node::int(2), Node::int(3)));
    Walker::new(rule, Order::In).run(&triple).unwrap();
    // 3 children: ceil(3/2) = 2 before ("a", "b"), floor(3/2) = 1 after ("c").
    assert_eq!(*log.borrow(), vec!["int", "int", "MyTriple", "int"]);
}

#[test]
fn reverse_flips_child_order_at_every_level() {
    let (rule, log) = VisitLog::new();
    Walker::new(rule, Order::Pre).reverse().run(&tree()).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["MyAdd", "MyInt", "int", "MyAdd", "MyInt", "int", "MyInt", "int"],
    );
}

#[test]
fn reverse_applied_twice_restores_original_order_for_pre() {
    let forward = child_order(4, false);
    let mut twice_reversed = child_order(4, true);
    twice_reversed.reverse();
    assert_eq!(forward, twice_reversed);
}

#[test]
fn post_rewrite_folds_nested_additions_in_one_pass() {
    let result = Walker::new(MySimplify, Order::Post).run(&tree()).unwrap();
    assert_eq!(result, Node::record(MyInt::new(Node::int(6))));
}

#[test]
fn pre_rewrite_short_circuits_before_descending_into_replaced_subtree() {
    // MySimplify replaces a MyAdd of two MyInts outright; Pre applies the rule
    // before descending, so the replacement (not the original children) is
    // what gets walked and rebuilt afterward.
    let result = Walker::new(MySimplify, Order::Pre).run(&two_level_add()).unwrap();
    assert_eq!(result, Node::record(MyInt::new(Node::int(3))));

    // A plain visit log confirms Pre visits the parent node before its children.
    let (log_rule, log) = VisitLog::new();
    Walker::new(log_rule, Order::Pre).run(&two_level_add()).unwrap();
    assert_eq!(log.borrow()[0], "MyAdd");
}

#[test]
fn traversal_visits_every_structural_position_exactly_once() {
    for order in [Order::Pre, Order::Post, Order::Level, Order::In] {
        let (rule, log) = VisitLog::new();
        Walker::new(rule, order).run(&tree()).unwrap();
        // tree() has 8 structural positions: 2 MyAdd, 3 MyInt, 3 int atoms.
        assert_eq!(log.borrow().len(), 8, "order {order:?} visited the wrong count");
    }
}

#[test]
fn rewrite_walker_rebuilds_containers_transparently() {
    #[derive(Debug, Clone, Default)]
    struct DoubleInts;
    impl RewriteRule for DoubleInts {
        fn generic_map(&mut self, node: &Node) -> Option<Node> {
            match node {
                Node::Atom(Atom::Int(i)) => Some(Node::int(i * 2)),
                _ => None,
            }
        }
    }

    let list = Node::sequence([Node::int(1), Node::int(2), Node::int(3)]);
    let result = Walker::new(DoubleInts, Order::Post).run(&list).unwrap();
    assert_eq!(result, Node::sequence([Node::int(2), Node::int(4), Node::int(6)]));

    let mapping = Node::mapping([("x".to_string(), Node::int(5))]);
    let result = Walker::new(DoubleInts, Order::Post).run(&mapping).unwrap();
    assert_eq!(result, Node::mapping([("x".to_string(), Node::int(10))]));

    let tuple = Node::tuple([Node::int(1), Node::int(2)]);
    let result = Walker::new(DoubleInts, Order::Post).run(&tuple).unwrap();
    assert_eq!(result, Node::tuple([Node::int(2), Node::int(4)]));
}

#[test]
fn no_op_conversion_like_rewrite_is_the_identity() {
    #[derive(Debug, Clone, Default)]
    struct Identity;
    impl RewriteRule for Identity {}

    let model = tree();
    let result = Walker::new(Identity, Order::Post).run(&model).unwrap();
    assert_eq!(result, model);
}
