//! Error surface for catalog loading and querying.
//!
//! Loading can fail in two ways: the resource could not be retrieved
//! ([`NetworkError`]) or it was retrieved but does not describe a usable
//! catalog ([`MalformedDataError`]). Both are wrapped in [`LoadError`].
//!
//! None of these ever reach the per-keystroke query path. A catalog whose
//! load failed simply answers `None` to every query.
//!
//! ```rust
//! use catalog::{LoadError, MalformedDataError};
//!
//! let err = LoadError::from(MalformedDataError::MissingPlaceholder);
//! assert!(err.is_malformed());
//! assert!(err.to_string().contains("%s"));
//! ```
use keyword_tree::{RecordIndex, TreeError};
use thiserror::Error;

use crate::catalog::CatalogState;

/// Retrieval of a suggestion resource failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NetworkError {
    /// A path could not be resolved against the source root.
    #[error("invalid resource url: {0}")]
    InvalidUrl(String),
    /// No fetcher is able to retrieve this scheme.
    #[error("unsupported url scheme {scheme:?}")]
    UnsupportedScheme { scheme: String },
    /// The HTTP client could not be constructed.
    #[error("http client setup failed: {0}")]
    Client(String),
    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("HTTP error {status} for {url}")]
    Status { url: String, status: u16 },
    /// Reading a local resource failed.
    #[error("io error: {0}")]
    Io(String),
}

/// The retrieved resource is structurally unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedDataError {
    /// Not JSON, a required field is missing, or a field has the wrong type.
    #[error("invalid suggestion data: {0}")]
    Json(String),
    /// The title template has no `%s` placeholder for the term.
    #[error("title template is missing its %s placeholder")]
    MissingPlaceholder,
    /// The tree resolves a phrase to a record the table does not contain.
    #[error("phrase {phrase:?} references record {index}, which is not in records")]
    DanglingIndex { phrase: String, index: RecordIndex },
    /// The serialized tree itself is inconsistent.
    #[error("invalid keyword tree: {0}")]
    Tree(#[from] TreeError),
}

impl From<serde_json::Error> for MalformedDataError {
    fn from(value: serde_json::Error) -> Self {
        MalformedDataError::Json(value.to_string())
    }
}

/// Loading a catalog failed; the catalog stays permanently unloaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("suggestion data retrieval failed: {0}")]
    Network(#[from] NetworkError),
    #[error("suggestion data malformed: {0}")]
    Malformed(#[from] MalformedDataError),
    /// `load` was already called on this catalog instance.
    #[error("catalog load already attempted (state: {state:?})")]
    AlreadyAttempted { state: CatalogState },
}

impl LoadError {
    pub fn is_network(&self) -> bool {
        matches!(self, LoadError::Network(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, LoadError::Malformed(_))
    }
}

/// A matched index has no record. Only reachable when index validation was
/// disabled at load time; queries turn it into `None`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("keyword tree returned record {index}, which the record table cannot resolve")]
pub struct LookupInconsistency {
    pub index: RecordIndex,
}
