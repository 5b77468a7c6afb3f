//! # Suggestion Catalog (`catalog`)
//!
//! Owns everything needed to turn typed text into a displayable sponsored
//! suggestion: the keyword tree, the record table it indexes into, the title
//! template, and the resolved icon location.
//!
//! ## Lifecycle
//!
//! 1. Create a [`SuggestionCatalog`] (unloaded).
//! 2. Call [`SuggestionCatalog::load`] once with a [`SourceRoot`] and a
//!    [`ResourceFetcher`]. This is the only suspension point.
//! 3. Call [`SuggestionCatalog::query`] on every keystroke. It answers `None`
//!    while loading, after a failed load, and when nothing matches.
//!
//! Load failures are terminal for the instance and never surface on the
//! query path.
//!
//! ## Data Format
//!
//! `data/suggestions.json` under the source root:
//!
//! ```json
//! {
//!   "title": "Visit %s",
//!   "records": { "0": { "term": "Rabbits Inc", "url": "https://example.com/rabbits" } },
//!   "tree": { "frabbits": { "^": 0 } }
//! }
//! ```
//!
//! ## Example
//!
//! ```
//! use catalog::{CatalogConfig, SuggestionCatalog, Suggestions};
//!
//! let data = br#"{
//!     "title": "Visit %s",
//!     "records": { "0": { "term": "Rabbits Inc", "url": "https://example.com/rabbits" } },
//!     "tree": { "frabbits": { "^": 0 } }
//! }"#;
//! let config = CatalogConfig::default();
//! let suggestions = Suggestions::from_slice(data, "file:///qs/icons/favicon.ico", &config).unwrap();
//! let catalog = SuggestionCatalog::ready(config, suggestions);
//!
//! let hit = catalog.query("frabbits").unwrap();
//! assert_eq!(hit.title, "Visit Rabbits Inc");
//! assert!(catalog.query("frab").is_none());
//! ```

mod catalog;
mod config;
mod error;
mod fetch;
mod root;
mod types;

pub use crate::catalog::{CatalogState, SuggestionCatalog, Suggestions, TITLE_PLACEHOLDER};
pub use crate::config::{CatalogConfig, ConfigError};
pub use crate::error::{LoadError, LookupInconsistency, MalformedDataError, NetworkError};
pub use crate::fetch::{ResourceFetcher, SourceFetcher};
pub use crate::root::SourceRoot;
pub use crate::types::{Record, RecordTable, SuggestionResult};

pub use keyword_tree::{MatchPolicy, RecordIndex, TreeConfig};
pub use reqwest::Url;
