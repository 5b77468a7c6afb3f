//! Lookup policy for [`KeywordTree`](crate::KeywordTree).
use serde::{Deserialize, Serialize};

/// How a candidate that stops short of a complete phrase is treated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Only candidates that land exactly on a stored phrase resolve.
    #[default]
    Exact,
    /// A candidate that is a prefix of stored phrases also resolves, provided
    /// every phrase below it points at the same record.
    UniquePrefix,
}

/// Tuning knobs for lookup. Cheap to copy and serde-friendly so it can be
/// embedded in higher-level configs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeConfig {
    /// Resolution policy for partial input.
    pub match_policy: MatchPolicy,
    /// Minimum number of normalized characters a candidate needs before a
    /// prefix may resolve. Ignored under [`MatchPolicy::Exact`].
    pub min_prefix_chars: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::Exact,
            min_prefix_chars: 1,
        }
    }
}

impl TreeConfig {
    /// Exact-match config, the default.
    pub fn exact() -> Self {
        Self::default()
    }

    /// Prefix-completion config requiring `min_prefix_chars` typed characters.
    pub fn unique_prefix(min_prefix_chars: usize) -> Self {
        Self {
            match_policy: MatchPolicy::UniquePrefix,
            min_prefix_chars,
        }
    }
}
