//! Append-only node storage and the builder that fills it.

use crate::Span;
use crate::tree::{NodeKind, Tree};

#[cfg(test)]
#[path = "./arena_tests.rs"]
mod tests;

/// Opaque reference to a node stored in a [`Builder`] or [`Tree`].
///
/// Handles are issued in creation order and stay valid for the lifetime of
/// the arena that issued them. They are not interchangeable between arenas.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Handle(u32);

impl Handle {
    /// Link value meaning "no node". Never issued by [`Builder::push`].
    pub(crate) const NONE: Handle = Handle(u32::MAX);

    #[inline]
    pub(crate) fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Zero-based position of the node in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node as stored in the arena.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) kind: NodeKind,
    pub(crate) data: Span,
    pub(crate) next: Handle,
    pub(crate) child: Handle,
}

/// Builds a [`Tree`] by appending nodes and linking them.
///
/// The builder is the only thing that mutates a tree. Kinds and data are
/// fixed when a node is pushed; each node's sibling and first-child links
/// can be assigned exactly once. [`Builder::finish`] consumes the builder, so
/// a spent builder cannot be reused.
///
/// # Examples
///
/// ```
/// use toml_arena::{Builder, NodeKind, Span};
///
/// let input = b"A = 1";
/// let mut builder = Builder::new(input);
/// let value = builder.push(NodeKind::Integer, Span::new(4, 5));
/// let key = builder.push(NodeKind::Key, Span::new(0, 1));
/// let kv = builder.push(NodeKind::KeyValue, Span::default());
/// builder.attach_child(kv, value);
/// builder.chain(value, key);
/// builder.append_root(kv);
///
/// let tree = builder.finish();
/// let entry = tree.iter().next().unwrap();
/// assert_eq!(entry.value().unwrap().data(), b"1");
/// assert_eq!(entry.key().unwrap().data(), b"A");
/// ```
pub struct Builder<'a> {
    input: &'a [u8],
    nodes: Vec<Slot>,
    root: Handle,
    root_tail: Handle,
}

impl<'a> Builder<'a> {
    /// Creates an empty builder whose leaf spans point into `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_capacity(input, 0)
    }

    /// Creates an empty builder with room for `nodes` nodes.
    pub fn with_capacity(input: &'a [u8], nodes: usize) -> Self {
        Builder {
            input,
            nodes: Vec::with_capacity(nodes),
            root: Handle::NONE,
            root_tail: Handle::NONE,
        }
    }

    /// Number of nodes pushed so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been pushed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a node with absent links and returns its handle.
    ///
    /// `data` must be [`Span::default()`] for container kinds.
    ///
    /// # Panics
    ///
    /// Panics if `data` lies outside the input, or if the arena already holds
    /// `u32::MAX` nodes.
    #[inline]
    pub fn push(&mut self, kind: NodeKind, data: Span) -> Handle {
        assert!(
            data.start <= data.end && data.end as usize <= self.input.len(),
            "node data {data:?} is outside the input"
        );
        debug_assert!(
            !kind.is_container() || data == Span::default(),
            "container {kind:?} carries data"
        );
        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "arena is full");
        self.nodes.push(Slot {
            kind,
            data,
            next: Handle::NONE,
            child: Handle::NONE,
        });
        Handle(index as u32)
    }

    /// Makes `b` the next sibling of `a`.
    ///
    /// # Panics
    ///
    /// Panics if `a` already has a next sibling, or if either handle was not
    /// issued by this builder.
    pub fn chain(&mut self, a: Handle, b: Handle) {
        self.check(b);
        let slot = &mut self.nodes[a.index()];
        assert!(slot.next.is_none(), "{a:?} already has a next sibling");
        slot.next = b;
    }

    /// Makes `first_child` the first child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` already has children, or if either handle was not
    /// issued by this builder.
    pub fn attach_child(&mut self, parent: Handle, first_child: Handle) {
        self.check(first_child);
        let slot = &mut self.nodes[parent.index()];
        assert!(slot.child.is_none(), "{parent:?} already has children");
        slot.child = first_child;
    }

    /// Appends `handle` to the top-level sequence of the tree.
    pub fn append_root(&mut self, handle: Handle) {
        if self.root.is_none() {
            self.check(handle);
            self.root = handle;
        } else {
            self.chain(self.root_tail, handle);
        }
        self.root_tail = handle;
    }

    /// Freezes the arena into an immutable [`Tree`].
    pub fn finish(self) -> Tree<'a> {
        Tree::new(self.input, self.nodes.into_boxed_slice(), self.root)
    }

    #[inline]
    fn check(&self, handle: Handle) {
        assert!(
            handle.index() < self.nodes.len(),
            "{handle:?} was not issued by this builder"
        );
    }
}

impl std::fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .finish()
    }
}
