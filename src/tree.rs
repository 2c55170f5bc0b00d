//! The immutable syntax tree and its traversal.

use crate::Span;
use crate::arena::{Handle, Slot};
use std::fmt;
use std::iter::FusedIterator;

#[cfg(test)]
#[path = "./tree_tests.rs"]
mod tests;

/// Syntactic category of a node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum NodeKind {
    /// A bare key. Leaf.
    Key,
    /// A string literal; `data` is the raw text between the quotes. Leaf.
    String,
    /// An integer literal in any radix. Leaf.
    Integer,
    /// A float literal, including `inf` and `nan`. Leaf.
    Float,
    /// `true` or `false`. Leaf.
    Bool,
    /// `[ ... ]`; children are the elements.
    Array,
    /// `{ ... }`; children are `KeyValue` nodes.
    InlineTable,
    /// `key = value`; children are the value, then the `Key`.
    KeyValue,
    /// A `[table]` section. Reserved for a document grammar layered on top,
    /// never produced by [`parse`](crate::parse).
    Table,
    /// An `[[array.of.tables]]` section. Reserved like [`NodeKind::Table`].
    ArrayTable,
}

impl NodeKind {
    /// Returns `true` for kinds that carry children instead of data.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Self::Array | Self::InlineTable | Self::KeyValue | Self::Table | Self::ArrayTable
        )
    }

    /// Short lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::InlineTable => "inline-table",
            Self::KeyValue => "key-value",
            Self::Table => "table",
            Self::ArrayTable => "array-table",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The finished result of a parse.
///
/// A tree owns its nodes and borrows the input buffer their data points
/// into. Nothing can modify it, so it can be shared freely between threads
/// and traversed by any number of independent [`Iter`]s.
pub struct Tree<'a> {
    input: &'a [u8],
    nodes: Box<[Slot]>,
    root: Handle,
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tree<'static>>();
};

impl<'a> Tree<'a> {
    pub(crate) fn new(input: &'a [u8], nodes: Box<[Slot]>, root: Handle) -> Self {
        Tree { input, nodes, root }
    }

    /// Iterates the top-level sequence of the tree.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            next: self.root,
        }
    }

    /// Returns the node behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not belong to this tree.
    pub fn node(&self, handle: Handle) -> Node<'_> {
        assert!(
            handle.index() < self.nodes.len(),
            "{handle:?} does not belong to this tree"
        );
        Node { tree: self, handle }
    }

    /// Total number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds no nodes, i.e. the document was empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The input buffer the tree was built over.
    #[inline]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Reports keys repeated in the top-level sequence.
    ///
    /// See [`Node::duplicate_keys`].
    pub fn duplicate_keys(&self) -> Vec<DuplicateKey<'_>> {
        duplicate_keys(self.iter())
    }

    #[inline]
    fn slot(&self, handle: Handle) -> &Slot {
        &self.nodes[handle.index()]
    }
}

impl<'t> IntoIterator for &'t Tree<'_> {
    type Item = Node<'t>;
    type IntoIter = Iter<'t>;

    fn into_iter(self) -> Iter<'t> {
        self.iter()
    }
}

impl fmt::Debug for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A read-only view of one node in a [`Tree`].
#[derive(Copy, Clone)]
pub struct Node<'t> {
    tree: &'t Tree<'t>,
    handle: Handle,
}

impl<'t> Node<'t> {
    /// The node's syntactic category.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.tree.slot(self.handle).kind
    }

    /// The exact input bytes of a leaf node; empty for containers.
    #[inline]
    pub fn data(&self) -> &'t [u8] {
        self.span().slice(self.tree.input)
    }

    /// [`Node::data`] as text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&'t str> {
        std::str::from_utf8(self.data()).ok()
    }

    /// Location of [`Node::data`] in the input. Containers have an empty
    /// span at offset zero.
    #[inline]
    pub fn span(&self) -> Span {
        self.tree.slot(self.handle).data
    }

    /// The node's handle within its tree.
    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Iterates the node's children in source order.
    #[inline]
    pub fn children(&self) -> Iter<'t> {
        Iter {
            tree: self.tree,
            next: self.tree.slot(self.handle).child,
        }
    }

    /// The value of a `KeyValue` node.
    pub fn value(&self) -> Option<Node<'t>> {
        if self.kind() != NodeKind::KeyValue {
            return None;
        }
        self.children().next()
    }

    /// The `Key` of a `KeyValue` node.
    pub fn key(&self) -> Option<Node<'t>> {
        if self.kind() != NodeKind::KeyValue {
            return None;
        }
        self.children().nth(1)
    }

    /// Reports keys that repeat among the entries of an inline table.
    ///
    /// Both entries stay in the tree; this only surfaces them so the
    /// consumer can decide how to treat a redefinition. Each report pairs
    /// the first `Key` with a later `Key` of the same text, in source order.
    /// Returns nothing for nodes that are not inline tables.
    pub fn duplicate_keys(&self) -> Vec<DuplicateKey<'t>> {
        if self.kind() != NodeKind::InlineTable {
            return Vec::new();
        }
        duplicate_keys(self.children())
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        if kind.is_container() {
            f.debug_tuple(kind.as_str())
                .field(&DebugChildren(*self))
                .finish()
        } else {
            let data = String::from_utf8_lossy(self.data());
            f.debug_tuple(kind.as_str()).field(&data).finish()
        }
    }
}

struct DebugChildren<'t>(Node<'t>);

impl fmt::Debug for DebugChildren<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.children()).finish()
    }
}

/// Forward-only traversal of one sibling chain.
///
/// Holds nothing but a cursor, so obtaining a fresh iterator is the way to
/// traverse a level again.
#[derive(Clone)]
pub struct Iter<'t> {
    tree: &'t Tree<'t>,
    next: Handle,
}

impl<'t> Iterator for Iter<'t> {
    type Item = Node<'t>;

    #[inline]
    fn next(&mut self) -> Option<Node<'t>> {
        if self.next.is_none() {
            return None;
        }
        let node = Node {
            tree: self.tree,
            handle: self.next,
        };
        self.next = self.tree.slot(self.next).next;
        Some(node)
    }
}

impl FusedIterator for Iter<'_> {}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("next", &self.next).finish()
    }
}

/// A key that appears more than once at the same level.
#[derive(Copy, Clone, Debug)]
pub struct DuplicateKey<'t> {
    /// The earliest `Key` node with this text.
    pub first: Node<'t>,
    /// A later `Key` node with the same text.
    pub duplicate: Node<'t>,
}

fn duplicate_keys<'t>(entries: Iter<'t>) -> Vec<DuplicateKey<'t>> {
    let mut seen: foldhash::HashMap<&'t [u8], Node<'t>> = Default::default();
    let mut found = Vec::new();
    for key in entries.filter_map(|entry| entry.key()) {
        match seen.get(key.data()) {
            Some(&first) => found.push(DuplicateKey {
                first,
                duplicate: key,
            }),
            None => {
                seen.insert(key.data(), key);
            }
        }
    }
    found
}
