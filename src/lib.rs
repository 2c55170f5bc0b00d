//! An arena-backed parser for TOML key/value documents that records every
//! literal as an exact span of the input.
//!
//! Parsing produces a flat [`Tree`]: nodes live in one contiguous arena and
//! refer to their first child and next sibling by [`Handle`]. Scalars are
//! never decoded. An integer node holds the bytes `0xdead_beef`, underscores
//! and all, and a string node holds the raw text between its quotes.
//! Turning that text into typed values is left to the consumer.
//!
//! # Examples
//!
//! ```
//! use toml_arena::NodeKind;
//!
//! let content = r#"
//! title = "example"
//! ports = [8000, 8001, 0x1F42]
//! owner = { name = "Tom", born = 1979 }
//! "#;
//!
//! let tree = toml_arena::parse_str(content)?;
//! let keys: Vec<&str> = tree
//!     .iter()
//!     .filter_map(|entry| entry.key())
//!     .filter_map(|key| key.text())
//!     .collect();
//! assert_eq!(keys, ["title", "ports", "owner"]);
//!
//! let ports = tree.iter().nth(1).and_then(|entry| entry.value()).unwrap();
//! assert_eq!(ports.kind(), NodeKind::Array);
//! let data: Vec<&[u8]> = ports.children().map(|port| port.data()).collect();
//! assert_eq!(data, [&b"8000"[..], b"8001", b"0x1F42"]);
//! # Ok::<(), toml_arena::Error>(())
//! ```

mod arena;
mod error;
pub mod number;
mod parser;
mod span;
mod tree;

pub use arena::{Builder, Handle};
pub use error::{Error, ErrorKind};
pub use number::NumberFault;
pub use parser::{parse, parse_str};
pub use span::Span;
pub use tree::{DuplicateKey, Iter, Node, NodeKind, Tree};

#[cfg(feature = "serde")]
pub mod impl_serde;
