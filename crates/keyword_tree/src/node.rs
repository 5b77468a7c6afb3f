use fxhash::FxHashMap;

use crate::RecordIndex;

/// Distinct record indices stored at or below a node.
///
/// Maintained on insert so that prefix resolution never has to walk a
/// subtree at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// No phrase ends at or below this node.
    #[default]
    None,
    /// Every phrase at or below this node resolves to the same record.
    Unique(RecordIndex),
    /// Phrases below this node resolve to at least two different records.
    Ambiguous,
}

impl Completion {
    pub(crate) fn merge(self, index: RecordIndex) -> Self {
        match self {
            Completion::None => Completion::Unique(index),
            Completion::Unique(existing) if existing == index => self,
            Completion::Unique(_) | Completion::Ambiguous => Completion::Ambiguous,
        }
    }

    /// The single record reachable from this node, if there is exactly one.
    pub fn unique(self) -> Option<RecordIndex> {
        match self {
            Completion::Unique(index) => Some(index),
            Completion::None | Completion::Ambiguous => None,
        }
    }
}

/// One character position in the keyword tree.
///
/// Children are owned by value, so every node has exactly one parent and the
/// structure can never contain a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    children: FxHashMap<char, TrieNode>,
    terminal: Option<RecordIndex>,
    completion: Completion,
}

impl TrieNode {
    /// Follows the edge labelled `ch`.
    #[inline]
    pub fn child(&self, ch: char) -> Option<&TrieNode> {
        self.children.get(&ch)
    }

    /// Record index of the phrase ending here, if any.
    #[inline]
    pub fn terminal(&self) -> Option<RecordIndex> {
        self.terminal
    }

    #[inline]
    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn children(&self) -> impl Iterator<Item = (char, &TrieNode)> {
        self.children.iter().map(|(ch, node)| (*ch, node))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The only child of this node, when it has exactly one.
    pub(crate) fn sole_child(&self) -> Option<(char, &TrieNode)> {
        if self.children.len() != 1 {
            return None;
        }
        self.children().next()
    }

    pub(crate) fn child_or_insert(&mut self, ch: char) -> &mut TrieNode {
        self.children.entry(ch).or_default()
    }

    pub(crate) fn set_terminal(&mut self, index: RecordIndex) {
        self.terminal = Some(index);
    }

    pub(crate) fn absorb(&mut self, index: RecordIndex) {
        self.completion = self.completion.merge(index);
    }
}
