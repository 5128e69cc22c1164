use super::*;
use crate::testkit::{MyAdd, MyInt};

#[test]
fn record_kind_chain_ends_at_node() {
    let n = Node::record(MyInt::new(Node::int(1)));
    assert_eq!(n.kind_chain(), vec!["MyInt", "MyMath", "Node"]);
}

#[test]
fn container_kind_chain_is_synthetic_plus_node() {
    let m = Node::mapping([("a".to_string(), Node::int(1))]);
    assert_eq!(m.kind_chain(), vec!["dict", "Node"]);
    let s = Node::sequence([Node::int(1)]);
    assert_eq!(s.kind_chain(), vec!["list", "Node"]);
    let t = Node::tuple([Node::int(1)]);
    assert_eq!(t.kind_chain(), vec!["tuple", "Node"]);
}

#[test]
fn record_equality_is_structural() {
    let a = Node::record(MyAdd::new(Node::int(1), Node::int(2)));
    let b = Node::record(MyAdd::new(Node::int(1), Node::int(2)));
    let c = Node::record(MyAdd::new(Node::int(1), Node::int(3)));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn mapping_equality_ignores_insertion_order() {
    let a = Node::mapping([
        ("a".to_string(), Node::int(1)),
        ("b".to_string(), Node::int(2)),
    ]);
    let b = Node::mapping([
        ("b".to_string(), Node::int(2)),
        ("a".to_string(), Node::int(1)),
    ]);
    assert_eq!(a, b);
}

#[test]
fn sequence_equality_is_order_sensitive() {
    let a = Node::sequence([Node::int(1), Node::int(2)]);
    let b = Node::sequence([Node::int(2), Node::int(1)]);
    assert_ne!(a, b);
}

#[test]
fn downcast_ref_narrows_record() {
    let n = Node::record(MyInt::new(Node::int(7)));
    let my_int = n.downcast_ref::<MyInt>().unwrap();
    assert_eq!(my_int.value, Node::int(7));
    assert!(n.downcast_ref::<MyAdd>().is_none());
}

#[test]
fn rebuild_record_round_trips() {
    let n = Node::record(MyAdd::new(Node::int(1), Node::int(2)));
    let children = n.children();
    let rebuilt = n.rebuild(children).unwrap();
    assert_eq!(n, rebuilt);
}

#[test]
fn rebuild_record_missing_field_is_schema_violation() {
    let n = Node::record(MyAdd::new(Node::int(1), Node::int(2)));
    let mut children = n.children();
    children.truncate(1);
    let err = n.rebuild(children).unwrap_err();
    assert!(matches!(err, Error::SchemaViolation { kind: "MyAdd", .. }));
}

#[test]
fn rebuild_sequence_preserves_index_order_regardless_of_input_order() {
    let n = Node::sequence([Node::int(1), Node::int(2), Node::int(3)]);
    let mut children = n.children();
    children.reverse();
    let rebuilt = n.rebuild(children).unwrap();
    assert_eq!(rebuilt, Node::sequence([Node::int(1), Node::int(2), Node::int(3)]));
}

#[test]
fn atom_float_round_trips_through_bit_pattern() {
    let n = Node::float(1.5);
    match n {
        Node::Atom(a) => assert_eq!(a.as_f64(), Some(1.5)),
        _ => panic!("expected atom"),
    }
}
