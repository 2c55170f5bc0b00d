use super::*;
use crate::parse_str;

#[test]
fn key_and_value_accessors() {
    let tree = parse_str("answer = 42").unwrap();
    let entry = tree.iter().next().unwrap();
    assert_eq!(entry.kind(), NodeKind::KeyValue);
    assert!(entry.data().is_empty());
    assert!(entry.span().is_empty());

    let value = entry.value().unwrap();
    assert_eq!(value.kind(), NodeKind::Integer);
    assert_eq!(value.text(), Some("42"));
    assert_eq!(value.span(), Span::new(9, 11));

    let key = entry.key().unwrap();
    assert_eq!(key.kind(), NodeKind::Key);
    assert_eq!(key.text(), Some("answer"));

    // leaves have neither key, value nor children
    assert!(value.key().is_none());
    assert!(value.value().is_none());
    assert_eq!(value.children().count(), 0);
}

#[test]
fn node_lookup_by_handle() {
    let tree = parse_str("a = [1, 2]").unwrap();
    let entry = tree.iter().next().unwrap();
    let again = tree.node(entry.handle());
    assert_eq!(again.kind(), NodeKind::KeyValue);
    assert_eq!(again.handle(), entry.handle());
    assert_eq!(tree.input(), b"a = [1, 2]");
    // array, 1, 2, key, key-value
    assert_eq!(tree.len(), 5);
}

#[test]
#[should_panic(expected = "does not belong to this tree")]
fn node_lookup_out_of_range_panics() {
    let big = parse_str("a = [1, 2, 3]").unwrap();
    let small = parse_str("a = 1").unwrap();
    let last = big.iter().next().unwrap().handle();
    let _ = small.node(last);
}

#[test]
fn iterators_are_independent_and_fused() {
    let tree = parse_str("a = 1\nb = 2\nc = 3").unwrap();
    let mut first = tree.iter();
    let second = tree.iter();
    assert_eq!(first.next().unwrap().key().unwrap().text(), Some("a"));
    assert_eq!(second.count(), 3);
    assert_eq!(first.by_ref().count(), 2);
    assert!(first.next().is_none());
    assert!(first.next().is_none());

    // a cloned iterator resumes from the same position
    let mut it = tree.iter();
    it.next();
    let rest: Vec<_> = it.clone().filter_map(|e| e.key()).map(|k| k.data()).collect();
    assert_eq!(rest, [b"b", b"c"]);
    assert_eq!(it.count(), 2);

    let via_into_iter = (&tree).into_iter().count();
    assert_eq!(via_into_iter, 3);
}

#[test]
fn debug_output_shows_structure() {
    let tree = parse_str("A = [\"x\", 1]").unwrap();
    assert_eq!(
        format!("{tree:?}"),
        r#"[key-value([array([string("x"), integer("1")]), key("A")])]"#
    );
}

#[test]
fn duplicate_keys_are_reported_not_removed() {
    let tree = parse_str("a = 1\nb = 2\na = 3\na = 4").unwrap();
    assert_eq!(tree.iter().count(), 4);

    let dups = tree.duplicate_keys();
    assert_eq!(dups.len(), 2);
    for dup in &dups {
        assert_eq!(dup.first.text(), Some("a"));
        assert_eq!(dup.duplicate.text(), Some("a"));
    }
    assert_eq!(dups[0].first.span(), Span::new(0, 1));
    assert_eq!(dups[0].duplicate.span(), Span::new(12, 13));
    assert_eq!(dups[1].duplicate.span(), Span::new(18, 19));

    let clean = parse_str("a = 1\nb = 2").unwrap();
    assert!(clean.duplicate_keys().is_empty());
}

#[test]
fn inline_table_duplicate_keys() {
    let tree = parse_str("t = { x = 1, y = 2, x = 3 }").unwrap();
    let table = tree.iter().next().unwrap().value().unwrap();
    let dups = table.duplicate_keys();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].first.text(), Some("x"));
    assert!(dups[0].first.span().start < dups[0].duplicate.span().start);

    // only inline tables report
    let entry = tree.iter().next().unwrap();
    assert!(entry.duplicate_keys().is_empty());
}

#[test]
fn kind_names_and_container_flag() {
    let containers = [
        NodeKind::Array,
        NodeKind::InlineTable,
        NodeKind::KeyValue,
        NodeKind::Table,
        NodeKind::ArrayTable,
    ];
    let leaves = [
        NodeKind::Key,
        NodeKind::String,
        NodeKind::Integer,
        NodeKind::Float,
        NodeKind::Bool,
    ];
    assert!(containers.iter().all(|k| k.is_container()));
    assert!(leaves.iter().all(|k| !k.is_container()));
    assert_eq!(NodeKind::InlineTable.to_string(), "inline-table");
    assert_eq!(NodeKind::KeyValue.as_str(), "key-value");
}

#[test]
fn trees_can_be_read_from_many_threads() {
    let input = "a = [1, 2, 3]\nb = { c = true }\nd = \"text\"";
    let tree = parse_str(input).unwrap();

    fn count(nodes: Iter<'_>) -> usize {
        nodes.map(|n| 1 + count(n.children())).sum()
    }

    let total = count(tree.iter());
    assert_eq!(total, tree.len());

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| count(tree.iter()))).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), total);
        }
    });
}
