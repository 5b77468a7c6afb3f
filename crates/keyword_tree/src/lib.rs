//! # Keyword Tree (`keyword_tree`)
//!
//! An in-memory trie that maps normalized keyword phrases to a record index.
//! The tree is built once from a compact JSON payload and then queried on
//! every keystroke, so lookup cost depends only on the length of the typed
//! text, never on how many phrases are stored.
//!
//! ## Core Types
//!
//! - [`KeywordTree`]: owns the root node; immutable once loaded.
//! - [`TreeConfig`] / [`MatchPolicy`]: whether only complete phrases resolve
//!   (`Exact`, the default) or an unambiguous prefix resolves too.
//! - [`TreeError`]: structural problems found while building the tree.
//!
//! ## Serialized Form
//!
//! Each node is a JSON object. The `"^"` key holds the record index of a
//! phrase that ends at that node; every other key is an edge label leading to
//! a child node. Labels may span several characters.
//!
//! ```
//! use keyword_tree::KeywordTree;
//! use serde_json::json;
//!
//! let tree = KeywordTree::from_json(&json!({ "frab": { "bits": { "^": 0 } } })).unwrap();
//!
//! assert_eq!(tree.get("frabbits"), Some(0));
//! assert_eq!(tree.get("  FRABBITS "), Some(0));
//! assert_eq!(tree.get("frab"), None);
//! ```

mod config;
mod error;
mod node;
mod normalize;
mod tree;

pub use crate::config::{MatchPolicy, TreeConfig};
pub use crate::error::TreeError;
pub use crate::node::{Completion, TrieNode};
pub use crate::normalize::{normalize, normalized_chars};
pub use crate::tree::{KeywordTree, RESULT_KEY};

/// Integer key joining a matched phrase to its display record.
pub type RecordIndex = u32;
