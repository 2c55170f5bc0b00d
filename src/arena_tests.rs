use super::*;

// -- Builder basics ---------------------------------------------------------

#[test]
fn handles_are_issued_in_order() {
    let input = b"abc";
    let mut builder = Builder::new(input);
    assert!(builder.is_empty());
    let a = builder.push(NodeKind::Key, Span::new(0, 1));
    let b = builder.push(NodeKind::Key, Span::new(1, 2));
    let c = builder.push(NodeKind::Array, Span::default());
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(c.index(), 2);
    assert!(a < b && b < c);
    assert_eq!(builder.len(), 3);
}

#[test]
fn finish_without_root_is_empty_sequence() {
    let input = b"x";
    let mut builder = Builder::new(input);
    builder.push(NodeKind::Key, Span::new(0, 1));
    let tree = builder.finish();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.iter().count(), 0);

    let tree = Builder::new(b"").finish();
    assert!(tree.is_empty());
    assert_eq!(tree.iter().count(), 0);
}

#[test]
fn root_sequence_follows_append_order() {
    let input = b"abc";
    let mut builder = Builder::with_capacity(input, 8);
    let c = builder.push(NodeKind::Key, Span::new(2, 3));
    let a = builder.push(NodeKind::Key, Span::new(0, 1));
    let b = builder.push(NodeKind::Key, Span::new(1, 2));
    builder.append_root(a);
    builder.append_root(b);
    builder.append_root(c);

    let tree = builder.finish();
    let data: Vec<&[u8]> = tree.iter().map(|n| n.data()).collect();
    assert_eq!(data, [&b"a"[..], b"b", b"c"]);
}

#[test]
fn chain_and_attach_build_nested_levels() {
    let input = b"[1, [2]]";
    let mut builder = Builder::new(input);
    let outer = builder.push(NodeKind::Array, Span::default());
    let one = builder.push(NodeKind::Integer, Span::new(1, 2));
    let inner = builder.push(NodeKind::Array, Span::default());
    let two = builder.push(NodeKind::Integer, Span::new(5, 6));
    builder.attach_child(outer, one);
    builder.chain(one, inner);
    builder.attach_child(inner, two);
    builder.append_root(outer);

    let tree = builder.finish();
    let outer = tree.iter().next().unwrap();
    assert_eq!(outer.kind(), NodeKind::Array);
    let mut children = outer.children();
    assert_eq!(children.next().unwrap().data(), b"1");
    let inner = children.next().unwrap();
    assert!(children.next().is_none());
    let grandchildren: Vec<_> = inner.children().map(|n| n.data()).collect();
    assert_eq!(grandchildren, [b"2"]);
}

#[test]
fn reserved_kinds_can_be_pushed() {
    let input = b"[server]";
    let mut builder = Builder::new(input);
    let table = builder.push(NodeKind::Table, Span::default());
    let key = builder.push(NodeKind::Key, Span::new(1, 7));
    builder.attach_child(table, key);
    builder.append_root(table);

    let tree = builder.finish();
    let table = tree.iter().next().unwrap();
    assert_eq!(table.kind(), NodeKind::Table);
    assert_eq!(table.children().next().unwrap().text(), Some("server"));
}

// -- Link-once invariants ---------------------------------------------------

#[test]
#[should_panic(expected = "already has a next sibling")]
fn chain_twice_panics() {
    let mut builder = Builder::new(b"ab");
    let a = builder.push(NodeKind::Key, Span::new(0, 1));
    let b = builder.push(NodeKind::Key, Span::new(1, 2));
    builder.chain(a, b);
    builder.chain(a, b);
}

#[test]
#[should_panic(expected = "already has children")]
fn attach_twice_panics() {
    let mut builder = Builder::new(b"a");
    let parent = builder.push(NodeKind::Array, Span::default());
    let child = builder.push(NodeKind::Key, Span::new(0, 1));
    builder.attach_child(parent, child);
    builder.attach_child(parent, child);
}

#[test]
#[should_panic(expected = "was not issued by this builder")]
fn foreign_handle_panics() {
    let mut other = Builder::new(b"abc");
    other.push(NodeKind::Key, Span::new(0, 1));
    other.push(NodeKind::Key, Span::new(1, 2));
    let foreign = other.push(NodeKind::Key, Span::new(2, 3));

    let mut builder = Builder::new(b"a");
    let a = builder.push(NodeKind::Key, Span::new(0, 1));
    builder.chain(a, foreign);
}

#[test]
#[should_panic(expected = "outside the input")]
fn data_outside_input_panics() {
    let mut builder = Builder::new(b"ab");
    builder.push(NodeKind::Key, Span::new(1, 5));
}
