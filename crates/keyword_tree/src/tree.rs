use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{MatchPolicy, TreeConfig};
use crate::error::TreeError;
use crate::node::TrieNode;
use crate::normalize::{normalize, normalized_chars};
use crate::RecordIndex;


/// Key that marks a complete phrase in the serialized tree.
pub const RESULT_KEY: &str = "^";

const MARKER: char = '^';

/// Trie over normalized keyword phrases.
///
/// Built once (usually via [`KeywordTree::from_json`]) and read-only after
/// that; [`KeywordTree::get`] never mutates, so shared references can be
/// queried from any number of callers without locking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTree {
    root: TrieNode,
    config: TreeConfig,
    len: usize,
}

impl KeywordTree {
    /// Empty tree with the exact-match policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            root: TrieNode::default(),
            config,
            len: 0,
        }
    }

    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Number of distinct phrases stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Adds `phrase` under `index`.
    ///
    /// Inserting the same pair twice is a no-op. Giving an already stored
    /// phrase a different index fails with [`TreeError::ConflictingTerminal`]
    /// and leaves the tree unchanged.
    pub fn insert(&mut self, phrase: &str, index: RecordIndex) -> Result<(), TreeError> {
        let normalized = normalize(phrase);
        if normalized.is_empty() {
            return Err(TreeError::EmptyPhrase);
        }
        if normalized.contains(MARKER) {
            return Err(TreeError::ReservedMarker { phrase: normalized });
        }

        let mut node = &mut self.root;
        for ch in normalized.chars() {
            node = node.child_or_insert(ch);
        }
        match node.terminal() {
            Some(existing) if existing == index => return Ok(()),
            Some(existing) => {
                return Err(TreeError::ConflictingTerminal {
                    phrase: normalized,
                    existing,
                    incoming: index,
                })
            }
            None => node.set_terminal(index),
        }
        self.len += 1;

        // Second pass: the path is known to exist now.
        let mut node = &mut self.root;
        node.absorb(index);
        for ch in normalized.chars() {
            node = node.child_or_insert(ch);
            node.absorb(index);
        }
        Ok(())
    }

    /// Builds a tree from its serialized form using the default config.
    pub fn from_json(value: &Value) -> Result<Self, TreeError> {
        Self::from_json_with_config(value, TreeConfig::default())
    }

    /// Builds a tree from its serialized form.
    ///
    /// Edge labels are concatenated from the root and the resulting phrase is
    /// normalized before insertion, so both nested single-character payloads
    /// and path-compressed payloads load into the same structure.
    pub fn from_json_with_config(value: &Value, config: TreeConfig) -> Result<Self, TreeError> {
        let mut tree = Self::with_config(config);
        let mut path = String::new();
        tree.load_node(value, &mut path)?;
        debug!(phrases = tree.len, "keyword_tree_loaded");
        Ok(tree)
    }

    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        let value: Value = serde_json::from_str(json).map_err(|e| TreeError::Json {
            message: e.to_string(),
        })?;
        Self::from_json(&value)
    }

    fn load_node(&mut self, value: &Value, path: &mut String) -> Result<(), TreeError> {
        let Value::Object(map) = value else {
            return Err(TreeError::NotAnObject { path: path.clone() });
        };

        for (key, child) in map {
            if key == RESULT_KEY {
                let index = child
                    .as_u64()
                    .and_then(|v| RecordIndex::try_from(v).ok())
                    .ok_or_else(|| TreeError::InvalidIndex {
                        path: path.clone(),
                        value: child.to_string(),
                    })?;
                self.insert(path, index)?;
                continue;
            }

            if key.is_empty() {
                return Err(TreeError::EmptyKey { path: path.clone() });
            }
            let mark = path.len();
            path.push_str(key);
            self.load_node(child, path)?;
            path.truncate(mark);
        }
        Ok(())
    }

    /// Serializes the tree, folding single-child chains into one label.
    pub fn to_json(&self) -> Value {
        node_to_json(&self.root)
    }

    /// Returns the record index for `text`, or `None`.
    ///
    /// Runs in time proportional to the length of `text` and allocates
    /// nothing.
    pub fn get(&self, text: &str) -> Option<RecordIndex> {
        let mut node = &self.root;
        let mut consumed = 0usize;
        for ch in normalized_chars(text) {
            node = node.child(ch)?;
            consumed += 1;
        }
        if consumed == 0 {
            return None;
        }

        node.terminal().or_else(|| match self.config.match_policy {
            MatchPolicy::Exact => None,
            MatchPolicy::UniquePrefix if consumed >= self.config.min_prefix_chars => {
                node.completion().unique()
            }
            MatchPolicy::UniquePrefix => None,
        })
    }

    /// All stored phrases with their indices, sorted by phrase.
    pub fn phrases(&self) -> Vec<(String, RecordIndex)> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = vec![(String::new(), &self.root)];
        while let Some((prefix, node)) = stack.pop() {
            if let Some(index) = node.terminal() {
                out.push((prefix.clone(), index));
            }
            for (ch, child) in node.children() {
                let mut next = prefix.clone();
                next.push(ch);
                stack.push((next, child));
            }
        }
        out.sort();
        out
    }
}

fn node_to_json(node: &TrieNode) -> Value {
    let mut map = Map::new();
    if let Some(index) = node.terminal() {
        map.insert(RESULT_KEY.to_string(), Value::from(index));
    }
    for (ch, child) in node.children() {
        let mut label = String::from(ch);
        let mut tail = child;
        while tail.terminal().is_none() {
            let Some((next_ch, next)) = tail.sole_child() else {
                break;
            };
            label.push(next_ch);
            tail = next;
        }
        map.insert(label, node_to_json(tail));
    }
    Value::Object(map)
}
