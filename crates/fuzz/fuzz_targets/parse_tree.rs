#![no_main]

use libfuzzer_sys::fuzz_target;
use toml_arena::{Iter, NodeKind};

fn walk(input: &[u8], nodes: Iter<'_>, seen: &mut usize) {
    for node in nodes {
        *seen += 1;
        let span = node.span();
        assert!(span.end as usize <= input.len());
        assert_eq!(node.data(), span.slice(input));

        if node.kind().is_container() {
            assert!(span.is_empty());
            for child in node.children() {
                assert!(child.handle() < node.handle());
            }
            if node.kind() == NodeKind::KeyValue {
                assert_eq!(node.children().count(), 2);
                assert_eq!(node.key().map(|k| k.kind()), Some(NodeKind::Key));
            }
            walk(input, node.children(), seen);
        } else {
            assert_eq!(node.children().count(), 0);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    match toml_arena::parse(data) {
        Ok(tree) => {
            let mut seen = 0;
            walk(data, tree.iter(), &mut seen);
            assert_eq!(seen, tree.len());
            std::hint::black_box(tree.duplicate_keys());
        }
        Err(err) => {
            assert!(err.span.start <= err.span.end);
            assert!(err.span.end as usize <= data.len());
            std::hint::black_box(err.to_string());
        }
    }
});
