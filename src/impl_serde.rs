#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Provides [`serde::Serialize`] support for [`Tree`] and [`Node`].
//!
//! A tree serializes as the sequence of its top-level nodes. Each node is a
//! map with its `kind`, then either its `data` (leaves, as lossy UTF-8) or
//! its `children` (containers).

use crate::{Node, NodeKind, Tree};
use serde::ser::{Serialize, SerializeMap, Serializer};

impl Serialize for NodeKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for Node<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let kind = self.kind();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("kind", &kind)?;
        if kind.is_container() {
            map.serialize_entry("children", &Children(*self))?;
        } else {
            map.serialize_entry("data", &String::from_utf8_lossy(self.data()))?;
        }
        map.end()
    }
}

struct Children<'t>(Node<'t>);

impl Serialize for Children<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.children())
    }
}

impl Serialize for Tree<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}
