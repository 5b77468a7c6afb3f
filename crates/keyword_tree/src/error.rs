use thiserror::Error;

use crate::RecordIndex;

/// Errors raised while building a [`KeywordTree`](crate::KeywordTree).
///
/// The `path` fields hold the normalized characters consumed from the root up
/// to the offending node, which is usually enough to find the entry in a large
/// payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// The payload text could not be parsed as JSON at all.
    #[error("tree payload is not valid JSON: {message}")]
    Json { message: String },

    /// A node in the payload was not a JSON object.
    #[error("tree node at {path:?} is not an object")]
    NotAnObject { path: String },

    /// The terminal marker did not hold an unsigned 32-bit integer.
    #[error("tree node at {path:?} has invalid record index {value}")]
    InvalidIndex { path: String, value: String },

    /// An edge label was empty (or became empty after normalization).
    #[error("tree node at {path:?} has an empty edge label")]
    EmptyKey { path: String },

    /// The phrase contains the character reserved for terminal markers.
    #[error("phrase {phrase:?} contains the reserved marker character '^'")]
    ReservedMarker { phrase: String },

    /// The phrase is empty after normalization.
    #[error("phrase is empty after normalization")]
    EmptyPhrase,

    /// The same phrase was given two different record indices.
    #[error("phrase {phrase:?} maps to both record {existing} and record {incoming}")]
    ConflictingTerminal {
        phrase: String,
        existing: RecordIndex,
        incoming: RecordIndex,
    },
}
